use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::syllable::SyllableCounter;

/// Separator between the two words of an order-2 key.
pub const PAIR_SEPARATOR: char = ' ';

/// Builds the order-2 key for two adjacent words.
pub fn pair_key(first: &str, second: &str) -> String {
	let mut key = String::with_capacity(first.len() + second.len() + 1);
	key.push_str(first);
	key.push(PAIR_SEPARATOR);
	key.push_str(second);
	key
}

/// Prefix used to look up continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix<'a> {
	/// Order-1 lookup on a single word.
	Word(&'a str),
	/// Order-2 lookup on two adjacent words.
	Pair(&'a str, &'a str),
}

/// First and second order suffix maps of a corpus.
///
/// Each key maps to every word observed right after it, in corpus order and
/// with duplicates kept. A word seen N times after a prefix is N times as
/// likely to be drawn by a uniform pick over the list.
///
/// # Invariants
/// - Keys are exact tokens, no case folding or trimming
/// - Order-2 keys are two tokens joined by [`PAIR_SEPARATOR`]
/// - Successor lists are never empty
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SuffixIndex {
	/// word -> words following it
	order1: HashMap<String, Vec<String>>,
	/// "word word" -> words following the pair
	order2: HashMap<String, Vec<String>>,
}

impl SuffixIndex {
	/// Builds both maps in one sequential pass over the corpus.
	pub fn build(corpus: &Corpus) -> Self {
		Self::build_window(corpus.words(), corpus.len())
	}

	/// Builds both maps on worker threads.
	///
	/// The corpus is cut into `num_cpus * 8` chunks of key positions. Each
	/// worker receives its chunk plus the two following tokens so that pairs
	/// straddling a chunk boundary are still recorded. Partial indexes are
	/// merged in chunk order, which makes the result identical to [`build`].
	///
	/// [`build`]: SuffixIndex::build
	pub fn build_parallel(corpus: &Corpus) -> Self {
		let words = corpus.words();
		if words.is_empty() {
			return Self::default();
		}

		let chunks = num_cpus::get() * 8;
		let chunk_size = words.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		for (chunk_index, start) in (0..words.len()).step_by(chunk_size).enumerate() {
			let tx = tx.clone();
			let end = (start + chunk_size).min(words.len());
			let window: Vec<String> = words[start..(end + 2).min(words.len())].to_vec();
			let keys = end - start;

			thread::spawn(move || {
				let partial = SuffixIndex::build_window(&window, keys);
				// The receiver outlives every sender, a failed send can only
				// mean the builder itself is gone.
				let _ = tx.send((chunk_index, partial));
			});
		}
		drop(tx);

		let mut partials: Vec<(usize, SuffixIndex)> = rx.iter().collect();
		partials.sort_by_key(|(chunk_index, _)| *chunk_index);

		let mut index = Self::default();
		for (_, partial) in &partials {
			index.merge(partial);
		}

		log::info!(
			"suffix index built from {} words on {} chunks: {} words, {} pairs",
			words.len(),
			partials.len(),
			index.word_count(),
			index.pair_count()
		);
		index
	}

	/// Indexes the first `keys` positions of `words`, using the tokens past
	/// `keys` only as successors.
	fn build_window(words: &[String], keys: usize) -> Self {
		let mut index = Self::default();

		for i in 0..keys {
			if i + 1 < words.len() {
				index.order1.entry(words[i].clone()).or_default().push(words[i + 1].clone());
			}
			if i + 2 < words.len() {
				index
					.order2
					.entry(pair_key(&words[i], &words[i + 1]))
					.or_default()
					.push(words[i + 2].clone());
			}
		}

		index
	}

	/// Words observed after `word`, if any.
	pub fn successors_of_word(&self, word: &str) -> Option<&[String]> {
		self.order1.get(word).map(Vec::as_slice)
	}

	/// Words observed after the pair `first second`, if any.
	pub fn successors_of_pair(&self, first: &str, second: &str) -> Option<&[String]> {
		self.order2.get(&pair_key(first, second)).map(Vec::as_slice)
	}

	/// Words observed after a one or two word prefix, if any.
	fn successors(&self, prefix: Prefix<'_>) -> Option<&[String]> {
		match prefix {
			Prefix::Word(word) => self.successors_of_word(word),
			Prefix::Pair(first, second) => self.successors_of_pair(first, second),
		}
	}

	/// Number of distinct order-1 keys.
	pub fn word_count(&self) -> usize {
		self.order1.len()
	}

	/// Number of distinct order-2 keys.
	pub fn pair_count(&self) -> usize {
		self.order2.len()
	}

	/// Continuations of `prefix` that keep the line within its budget.
	///
	/// A successor is kept if and only if
	/// `current + syllables(successor) <= target`. An unknown prefix yields an
	/// empty list, which tells the caller to draw another prefix. Duplicates
	/// and corpus order are preserved.
	pub fn candidates_after<C: SyllableCounter + ?Sized>(
		&self,
		prefix: Prefix<'_>,
		counter: &C,
		current: usize,
		target: usize,
	) -> Vec<&str> {
		let accepted: Vec<&str> = match self.successors(prefix) {
			Some(suffixes) => suffixes
				.iter()
				.map(String::as_str)
				.filter(|candidate| current + counter.count(candidate) <= target)
				.collect(),
			None => Vec::new(),
		};
		log::debug!("accepted words after {:?} = {:?}", prefix, accepted);
		accepted
	}

	/// Appends the successor lists of `other` to the lists of `self`.
	///
	/// Keys missing from `self` are cloned as-is.
	pub fn merge(&mut self, other: &Self) {
		for (key, suffixes) in &other.order1 {
			self.order1.entry(key.clone()).or_default().extend(suffixes.iter().cloned());
		}
		for (key, suffixes) in &other.order2 {
			self.order2.entry(key.clone()).or_default().extend(suffixes.iter().cloned());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::syllable::DictionaryCounter;

	fn pond() -> Corpus {
		Corpus::from_text("old pond frog jumps in the sound of water")
	}

	fn pond_counter() -> DictionaryCounter {
		DictionaryCounter::from_pairs([
			("old", 1),
			("pond", 1),
			("frog", 1),
			("jumps", 1),
			("in", 1),
			("the", 1),
			("sound", 1),
			("of", 1),
			("water", 2),
		])
	}

	#[test]
	fn order1_maps_each_word_to_its_follower() {
		let index = SuffixIndex::build(&pond());
		assert_eq!(index.successors_of_word("old"), Some(&["pond".to_owned()][..]));
		assert_eq!(index.successors_of_word("pond"), Some(&["frog".to_owned()][..]));
		assert_eq!(index.successors_of_word("water"), None);
		assert_eq!(index.word_count(), 8);
	}

	#[test]
	fn order2_maps_pairs_to_third_word() {
		let index = SuffixIndex::build(&pond());
		assert_eq!(index.successors_of_pair("old", "pond"), Some(&["frog".to_owned()][..]));
		assert_eq!(index.successors_of_pair("of", "water"), None);
		assert_eq!(index.pair_count(), 7);
	}

	#[test]
	fn duplicates_are_kept_in_corpus_order() {
		let index = SuffixIndex::build(&Corpus::from_text("a b a c a b a b"));
		let after_a: Vec<&str> = index.successors_of_word("a").unwrap().iter().map(String::as_str).collect();
		assert_eq!(after_a, ["b", "c", "b", "b"]);
	}

	#[test]
	fn keys_are_exact_tokens() {
		let index = SuffixIndex::build(&Corpus::from_text("Pond frog pond toad"));
		assert_eq!(index.successors_of_word("Pond").unwrap(), ["frog"]);
		assert_eq!(index.successors_of_word("pond").unwrap(), ["toad"]);
	}

	#[test]
	fn build_is_idempotent() {
		let corpus = pond();
		assert_eq!(SuffixIndex::build(&corpus), SuffixIndex::build(&corpus));
	}

	#[test]
	fn parallel_build_matches_sequential() {
		let text = "the wind the leaves the wind in the old pond the frog ".repeat(97);
		let corpus = Corpus::from_text(&text);
		assert_eq!(SuffixIndex::build_parallel(&corpus), SuffixIndex::build(&corpus));
	}

	#[test]
	fn parallel_build_handles_tiny_corpora() {
		for text in ["", "one", "one two", "one two three"] {
			let corpus = Corpus::from_text(text);
			assert_eq!(SuffixIndex::build_parallel(&corpus), SuffixIndex::build(&corpus));
		}
	}

	#[test]
	fn candidates_respect_budget() {
		let index = SuffixIndex::build(&pond());
		let counter = pond_counter();

		assert_eq!(index.candidates_after(Prefix::Pair("sound", "of"), &counter, 3, 5), ["water"]);
		assert!(index.candidates_after(Prefix::Pair("sound", "of"), &counter, 4, 5).is_empty());
		assert_eq!(index.candidates_after(Prefix::Word("old"), &counter, 4, 5), ["pond"]);
	}

	#[test]
	fn unknown_prefix_yields_no_candidates() {
		let index = SuffixIndex::build(&pond());
		let counter = pond_counter();
		assert!(index.candidates_after(Prefix::Word("toad"), &counter, 0, 5).is_empty());
		assert!(index.candidates_after(Prefix::Pair("pond", "old"), &counter, 0, 5).is_empty());
	}

	#[test]
	fn candidates_keep_duplicates() {
		let index = SuffixIndex::build(&Corpus::from_text("a b a b a c"));
		let counter = DictionaryCounter::from_pairs([("a", 1), ("b", 1), ("c", 3)]);
		assert_eq!(index.candidates_after(Prefix::Word("a"), &counter, 0, 2), ["b", "b"]);
	}

	#[test]
	fn shrinking_budget_never_adds_candidates() {
		let corpus = Corpus::from_text("a b a water a c a beautiful a b");
		let index = SuffixIndex::build(&corpus);
		let counter = DictionaryCounter::from_pairs([("b", 1), ("c", 1), ("water", 2), ("beautiful", 3)]);

		let mut previous = usize::MAX;
		for current in 0..=5 {
			let size = index.candidates_after(Prefix::Word("a"), &counter, current, 5).len();
			assert!(size <= previous);
			previous = size;
		}
		assert_eq!(previous, 0);
	}

	#[test]
	fn merge_appends_successors() {
		let mut left = SuffixIndex::build(&Corpus::from_text("a b c"));
		let right = SuffixIndex::build(&Corpus::from_text("a d e"));
		left.merge(&right);
		assert_eq!(left.successors_of_word("a").unwrap(), ["b", "d"]);
		assert_eq!(left.successors_of_pair("d", "e"), None);
		assert_eq!(left.successors_of_pair("a", "d").unwrap(), ["e"]);
	}
}
