use rand::Rng;
use rand::seq::IndexedRandom;

use crate::corpus::Corpus;
use crate::error::HaikuError;
use crate::model::config::GenerationConfig;
use crate::model::suffix_index::{Prefix, SuffixIndex};
use crate::syllable::SyllableCounter;

/// Last two words of a completed line.
///
/// Seeds the order-2 chain of the next line so that the haiku reads as one
/// continuous walk. Empty before the first line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryCarrier(Option<[String; 2]>);

impl BoundaryCarrier {
	/// Carrier of a haiku that has no line yet.
	pub fn empty() -> Self {
		Self(None)
	}

	pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self(Some([first.into(), second.into()]))
	}

	/// Takes the two trailing tokens of `line`.
	///
	/// A line shorter than two words yields an empty carrier.
	pub fn from_line(line: &[String]) -> Self {
		match line {
			[.., first, second] => Self::new(first.as_str(), second.as_str()),
			_ => Self::empty(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_none()
	}

	/// Either no word or exactly two.
	pub fn words(&self) -> &[String] {
		match &self.0 {
			Some(words) => words,
			None => &[],
		}
	}
}

/// A completed line and the state needed to continue the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
	/// Words of the new line. For a continued line the carried words are
	/// not repeated here.
	pub words: Vec<String>,

	/// Sum of the syllables of `words`, always equal to the requested target.
	pub syllables: usize,

	/// Trailing two words, seed of the next line.
	pub carrier: BoundaryCarrier,

	/// Failed draws (prefix misses, rejected seeds, over-budget words,
	/// zero-syllable words) spent on this line.
	pub retries: usize,
}

/// Counts failed draws against the configured ceiling.
struct RetryBudget {
	used: usize,
	limit: Option<usize>,
	target: usize,
}

impl RetryBudget {
	fn new(limit: Option<usize>, target: usize) -> Self {
		Self { used: 0, limit, target }
	}

	fn fail(&mut self) -> Result<(), HaikuError> {
		self.used += 1;
		match self.limit {
			Some(limit) if self.used > limit => Err(HaikuError::GenerationFailed {
				target: self.target,
				attempts: self.used,
			}),
			_ => Ok(()),
		}
	}
}

/// Grows syllable-bounded lines by walking the suffix indexes.
///
/// All collaborators are borrowed: one generator can be created per request
/// over a model shared between threads.
pub struct LineGenerator<'a, C: SyllableCounter + ?Sized> {
	corpus: &'a Corpus,
	index: &'a SuffixIndex,
	counter: &'a C,
	config: &'a GenerationConfig,
}

impl<'a, C: SyllableCounter + ?Sized> LineGenerator<'a, C> {
	/// Creates a generator over a corpus and the index built from it.
	///
	/// # Errors
	/// Returns `HaikuError::CorpusTooSmall` if the corpus has fewer than three
	/// words or the index holds no pair: every lookup would miss forever.
	pub fn new(
		corpus: &'a Corpus,
		index: &'a SuffixIndex,
		counter: &'a C,
		config: &'a GenerationConfig,
	) -> Result<Self, HaikuError> {
		if corpus.len() < 3 || index.pair_count() == 0 {
			return Err(HaikuError::CorpusTooSmall { words: corpus.len() });
		}
		Ok(Self { corpus, index, counter, config })
	}

	/// Draws a random corpus word of at most `max_seed_syllables` syllables.
	///
	/// # Errors
	/// Returns `HaikuError::SeedNotFound` once the retry ceiling is reached.
	pub fn pick_seed<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(String, usize), HaikuError> {
		let mut budget = RetryBudget::new(self.config.max_retries, self.config.max_seed_syllables());
		self.draw_seed(rng, &mut budget).map_err(|e| match e {
			HaikuError::GenerationFailed { attempts, .. } => HaikuError::SeedNotFound {
				max_syllables: self.config.max_seed_syllables(),
				attempts,
			},
			other => other,
		})
	}

	fn draw_seed<R: Rng + ?Sized>(&self, rng: &mut R, budget: &mut RetryBudget) -> Result<(String, usize), HaikuError> {
		loop {
			let word = self.random_word(rng)?;
			let syllables = self.counter.count(word);
			if syllables <= self.config.max_seed_syllables() {
				log::debug!("random word & syllables = {} {}", word, syllables);
				return Ok((word.to_owned(), syllables));
			}
			budget.fail()?;
		}
	}

	/// Builds a line of exactly `target` syllables.
	///
	/// With an empty carrier the line starts from a random seed word. Otherwise
	/// the carried pair prefixes the walk without counting toward `target`.
	///
	/// # Errors
	/// Returns `HaikuError::GenerationFailed` if the retry ceiling is reached.
	pub fn generate_line<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		carrier: &BoundaryCarrier,
		target: usize,
	) -> Result<LineOutcome, HaikuError> {
		let mut budget = RetryBudget::new(self.config.max_retries, target);

		match carrier.words() {
			[first, second] => {
				let line = vec![first.clone(), second.clone()];
				self.extend_line(rng, line, 2, 0, target, &mut budget)
			}
			_ => {
				let (seed, syllables) = self.draw_seed(rng, &mut budget)?;
				self.bootstrap(rng, seed, syllables, target, &mut budget)
			}
		}
	}

	/// Builds a first line starting with `seed` instead of a random word.
	///
	/// # Errors
	/// Returns `HaikuError::InvalidSeed` if `seed` exceeds the seed cap.
	pub fn generate_from_seed<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		seed: &str,
		target: usize,
	) -> Result<LineOutcome, HaikuError> {
		let syllables = self.counter.count(seed);
		let max_syllables = self.config.max_seed_syllables().min(target.saturating_sub(1));
		if syllables > max_syllables {
			return Err(HaikuError::InvalidSeed { word: seed.to_owned(), syllables, max_syllables });
		}

		let mut budget = RetryBudget::new(self.config.max_retries, target);
		self.bootstrap(rng, seed.to_owned(), syllables, target, &mut budget)
	}

	/// Adds the second word of a first line through the order-1 index, then
	/// hands over to the order-2 walk unless the line is already complete.
	fn bootstrap<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		seed: String,
		seed_syllables: usize,
		target: usize,
		budget: &mut RetryBudget,
	) -> Result<LineOutcome, HaikuError> {
		let mut syllables = seed_syllables;

		let mut candidates = self.index.candidates_after(Prefix::Word(&seed), self.counter, syllables, target);
		let word = loop {
			if let Some(word) = candidates.choose(rng) {
				break (*word).to_owned();
			}
			budget.fail()?;
			let prefix = self.random_word(rng)?;
			log::debug!("new random prefix = {}", prefix);
			candidates = self.index.candidates_after(Prefix::Word(prefix), self.counter, syllables, target);
		};
		let word_syllables = self.counter.count(&word);
		log::debug!("word & syllables = {} {}", word, word_syllables);

		syllables += word_syllables;
		let line = vec![seed, word];

		if syllables == target {
			return Ok(LineOutcome {
				carrier: BoundaryCarrier::from_line(&line),
				words: line,
				syllables,
				retries: budget.used,
			});
		}

		self.extend_line(rng, line, 0, syllables, target, budget)
	}

	/// Order-2 walk until the line reaches `target` syllables.
	///
	/// `carried` leading words of `line` belong to the previous line and are
	/// dropped from the returned words.
	fn extend_line<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		mut line: Vec<String>,
		carried: usize,
		mut syllables: usize,
		target: usize,
		budget: &mut RetryBudget,
	) -> Result<LineOutcome, HaikuError> {
		while syllables < target {
			let word = self.next_word(rng, &line, syllables, target, budget)?;
			let word_syllables = self.counter.count(&word);
			log::debug!("word & syllables = {} {}", word, word_syllables);

			if syllables + word_syllables > target {
				budget.fail()?;
				continue;
			}

			line.push(word);
			syllables += word_syllables;

			// A silent token makes no progress toward the target.
			if word_syllables == 0 {
				budget.fail()?;
			}
		}

		let carrier = BoundaryCarrier::from_line(&line);
		let words = line.split_off(carried);
		log::debug!("line = {:?}", words);

		Ok(LineOutcome { words, syllables, carrier, retries: budget.used })
	}

	/// Draws the continuation of the last two words of `line`, falling back to
	/// random corpus pairs while no successor fits the remaining budget.
	fn next_word<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		line: &[String],
		syllables: usize,
		target: usize,
		budget: &mut RetryBudget,
	) -> Result<String, HaikuError> {
		let [.., first, second] = line else {
			return Err(HaikuError::CorpusTooSmall { words: line.len() });
		};

		let mut candidates = self.index.candidates_after(Prefix::Pair(first, second), self.counter, syllables, target);
		loop {
			if let Some(word) = candidates.choose(rng) {
				return Ok((*word).to_owned());
			}
			budget.fail()?;
			let (first, second) = self
				.corpus
				.random_pair(rng)
				.ok_or(HaikuError::CorpusTooSmall { words: self.corpus.len() })?;
			log::debug!("new random prefix = {} {}", first, second);
			candidates = self.index.candidates_after(Prefix::Pair(first, second), self.counter, syllables, target);
		}
	}

	fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&'a str, HaikuError> {
		self.corpus
			.random_word(rng)
			.ok_or(HaikuError::CorpusTooSmall { words: self.corpus.len() })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::syllable::DictionaryCounter;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn fixture(text: &str) -> (Corpus, SuffixIndex) {
		let corpus = Corpus::from_text(text);
		let index = SuffixIndex::build(&corpus);
		(corpus, index)
	}

	fn total(counter: &DictionaryCounter, words: &[String]) -> usize {
		words.iter().map(|w| counter.count(w)).sum()
	}

	#[test]
	fn carrier_from_line_keeps_last_two_words() {
		let line: Vec<String> = ["old", "pond", "frog"].iter().map(|w| w.to_string()).collect();
		assert_eq!(BoundaryCarrier::from_line(&line), BoundaryCarrier::new("pond", "frog"));
		assert!(BoundaryCarrier::from_line(&line[..1]).is_empty());
		assert!(BoundaryCarrier::empty().words().is_empty());
	}

	#[test]
	fn rejects_corpus_without_pairs() {
		let (corpus, index) = fixture("old pond");
		let counter = DictionaryCounter::default();
		let config = GenerationConfig::default();
		let result = LineGenerator::new(&corpus, &index, &counter, &config);
		assert!(matches!(result, Err(HaikuError::CorpusTooSmall { words: 2 })));
	}

	#[test]
	fn seed_never_exceeds_cap() {
		let (corpus, index) = fixture("tremendously old extraordinary pond");
		let counter = DictionaryCounter::from_pairs([("tremendously", 5), ("extraordinary", 6), ("old", 1), ("pond", 1)]);
		let config = GenerationConfig::default();
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..100 {
			let (word, syllables) = generator.pick_seed(&mut rng).unwrap();
			assert!(syllables <= 4);
			assert!(word == "old" || word == "pond");
		}
	}

	#[test]
	fn seed_search_gives_up_at_ceiling() {
		let (corpus, index) = fixture("tremendously extraordinary tremendously");
		let counter = DictionaryCounter::from_pairs([("tremendously", 5), ("extraordinary", 6)]);
		let mut config = GenerationConfig::default();
		config.max_retries = Some(20);
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let result = generator.pick_seed(&mut StdRng::seed_from_u64(1));
		assert!(matches!(result, Err(HaikuError::SeedNotFound { max_syllables: 4, attempts: 21 })));
	}

	#[test]
	fn first_line_short_circuits_at_two_words() {
		let (corpus, index) = fixture("big gigantic big gigantic big");
		let counter = DictionaryCounter::from_pairs([("big", 1), ("gigantic", 4)]);
		let config = GenerationConfig::default();
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		for seed in 0..20 {
			let mut rng = StdRng::seed_from_u64(seed);
			let outcome = generator.generate_line(&mut rng, &BoundaryCarrier::empty(), 5).unwrap();
			assert_eq!(outcome.words.len(), 2);
			assert_eq!(outcome.syllables, 5);
			assert_eq!(outcome.carrier.words(), outcome.words.as_slice());
		}
	}

	#[test]
	fn continued_line_excludes_carried_words() {
		let (corpus, index) = fixture("a b c d e f g h i j k l");
		let counter = DictionaryCounter::from_pairs(
			["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"].map(|w| (w, 1)),
		);
		let config = GenerationConfig::default();
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let mut rng = StdRng::seed_from_u64(5);
		let outcome = generator.generate_line(&mut rng, &BoundaryCarrier::new("a", "b"), 5).unwrap();
		assert_eq!(outcome.words, ["c", "d", "e", "f", "g"]);
		assert_eq!(outcome.carrier, BoundaryCarrier::new("f", "g"));
		assert_eq!(outcome.retries, 0);
	}

	#[test]
	fn lines_hit_target_exactly() {
		let (corpus, index) = fixture(
			"an old silent pond a frog jumps into the pond splash silence again \
			 the light of a candle is transferred to another candle spring twilight",
		);
		let counter = DictionaryCounter::default();
		let config = GenerationConfig::default();
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		for seed in 0..30 {
			let mut rng = StdRng::seed_from_u64(seed);
			let first = generator.generate_line(&mut rng, &BoundaryCarrier::empty(), 5).unwrap();
			assert_eq!(total(&counter, &first.words), 5);
			let second = generator.generate_line(&mut rng, &first.carrier, 7).unwrap();
			assert_eq!(total(&counter, &second.words), 7);
		}
	}

	#[test]
	fn custom_seed_starts_the_line() {
		let (corpus, index) = fixture("old pond frog jumps in the sound of water");
		let counter = DictionaryCounter::from_pairs([("water", 2)]);
		let config = GenerationConfig::default();
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let outcome = generator.generate_from_seed(&mut StdRng::seed_from_u64(2), "old", 5).unwrap();
		assert_eq!(outcome.words[0], "old");
		assert_eq!(outcome.words[1], "pond");
		assert_eq!(total(&counter, &outcome.words), 5);

		let too_long = DictionaryCounter::from_pairs([("old", 5)]);
		let generator = LineGenerator::new(&corpus, &index, &too_long, &config).unwrap();
		let result = generator.generate_from_seed(&mut StdRng::seed_from_u64(2), "old", 5);
		assert!(matches!(result, Err(HaikuError::InvalidSeed { syllables: 5, .. })));
	}

	#[test]
	fn silent_tokens_count_against_the_ceiling() {
		let (corpus, index) = fixture("old pond ... ... ...");
		let counter = DictionaryCounter::default();
		let mut config = GenerationConfig::default();
		config.max_retries = Some(50);
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let carrier = BoundaryCarrier::new("...", "...");
		let result = generator.generate_line(&mut StdRng::seed_from_u64(6), &carrier, 5);
		assert!(matches!(result, Err(HaikuError::GenerationFailed { target: 5, attempts: 51 })));
	}

	#[test]
	fn unreachable_budget_fails_at_ceiling() {
		let (corpus, index) = fixture("banana papaya banana papaya");
		let counter = DictionaryCounter::from_pairs([("banana", 3), ("papaya", 3)]);
		let mut config = GenerationConfig::default();
		config.max_retries = Some(50);
		let generator = LineGenerator::new(&corpus, &index, &counter, &config).unwrap();

		let result = generator.generate_line(&mut StdRng::seed_from_u64(9), &BoundaryCarrier::empty(), 5);
		assert!(matches!(result, Err(HaikuError::GenerationFailed { target: 5, attempts: 51 })));
	}
}
