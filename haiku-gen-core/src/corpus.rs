use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::HaikuError;
use crate::io::read_file;

/// Flattened training text: every whitespace-delimited token in source order.
///
/// Tokens are kept exactly as they appear (case and punctuation included) and
/// duplicates are preserved. A corpus is never modified once the indexes have
/// been built from it, except by [`Corpus::extend`] when whole models are merged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
	words: Vec<String>,
}

impl Corpus {
	/// Tokenizes raw text: newlines become spaces, then split on whitespace.
	pub fn from_text(raw: &str) -> Self {
		let words = raw
			.replace('\n', " ")
			.split_whitespace()
			.map(str::to_owned)
			.collect();
		Self { words }
	}

	/// Builds a corpus from already tokenized words.
	pub fn from_words<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { words: words.into_iter().map(Into::into).collect() }
	}

	/// Reads and tokenizes a training file.
	///
	/// # Errors
	/// Returns `HaikuError::Io` if the file is missing or unreadable.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HaikuError> {
		let raw = read_file(path)?;
		Ok(Self::from_text(&raw))
	}

	pub fn words(&self) -> &[String] {
		&self.words
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Returns a uniformly random token, or `None` for an empty corpus.
	pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		self.words.choose(rng).map(String::as_str)
	}

	/// Returns the tokens at `i` and `i + 1` for a uniformly random `i`.
	///
	/// Returns `None` when the corpus holds fewer than two tokens.
	pub fn random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, &str)> {
		if self.words.len() < 2 {
			return None;
		}
		let index = rng.random_range(0..self.words.len() - 1);
		Some((&self.words[index], &self.words[index + 1]))
	}

	/// Appends every token of `other` after the tokens of `self`.
	pub fn extend(&mut self, other: &Self) {
		self.words.extend(other.words.iter().cloned());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn from_text_splits_lines_and_spaces() {
		let corpus = Corpus::from_text("old pond\n  frog jumps\tin\n\nthe sound");
		assert_eq!(corpus.words(), ["old", "pond", "frog", "jumps", "in", "the", "sound"]);
	}

	#[test]
	fn from_text_keeps_case_and_punctuation() {
		let corpus = Corpus::from_text("Old pond, old pond.");
		assert_eq!(corpus.words(), ["Old", "pond,", "old", "pond."]);
	}

	#[test]
	fn random_pair_returns_adjacent_tokens() {
		let corpus = Corpus::from_text("a b c d e");
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			let (first, second) = corpus.random_pair(&mut rng).unwrap();
			let position = corpus.words().iter().position(|w| w == first).unwrap();
			assert_eq!(corpus.words()[position + 1], second);
		}
	}

	#[test]
	fn random_draws_on_tiny_corpus() {
		let mut rng = StdRng::seed_from_u64(3);
		assert!(Corpus::default().random_word(&mut rng).is_none());
		assert!(Corpus::from_text("alone").random_pair(&mut rng).is_none());
	}

	#[test]
	fn load_missing_file_is_io_error() {
		let result = Corpus::load("does/not/exist.txt");
		assert!(matches!(result, Err(HaikuError::Io(_))));
	}
}
