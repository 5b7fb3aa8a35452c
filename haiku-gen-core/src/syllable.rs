//! Syllable oracle used to budget haiku lines.
//!
//! Counting is approximate: the generator only needs a deterministic answer
//! for each token, not a linguistically exact one.

use std::collections::HashMap;
use std::path::Path;

use crate::error::HaikuError;
use crate::io::read_file;

/// Maps a word token to its number of syllables.
///
/// Implementations must be pure: the same token always reports the same
/// count during a run, otherwise completed lines may miss their target.
pub trait SyllableCounter {
	fn count(&self, word: &str) -> usize;
}

/// Keeps the lowercase letters of a token, dropping punctuation and digits.
fn normalize(word: &str) -> String {
	word.chars()
		.filter(|c| c.is_alphabetic())
		.flat_map(char::to_lowercase)
		.collect()
}

fn is_vowel(c: char) -> bool {
	matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel-group counter for English text.
///
/// - Each run of vowels (`y` included) is one syllable
/// - A trailing silent `e` is dropped, except after `l` ("little")
/// - Any token containing a letter has at least one syllable
/// - Tokens without letters ("—", "...") have none
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl SyllableCounter for HeuristicCounter {
	fn count(&self, word: &str) -> usize {
		let letters = normalize(word);
		if letters.is_empty() {
			return 0;
		}

		let mut groups = 0;
		let mut previous_vowel = false;
		for c in letters.chars() {
			let vowel = is_vowel(c);
			if vowel && !previous_vowel {
				groups += 1;
			}
			previous_vowel = vowel;
		}

		if groups > 1 && letters.ends_with('e') && !letters.ends_with("le") {
			groups -= 1;
		}

		groups.max(1)
	}
}

/// Exact per-word counts with a heuristic fallback for unknown words.
///
/// Lookups are case-insensitive and ignore punctuation, so `"Pond,"` and
/// `"pond"` share an entry.
#[derive(Debug, Clone, Default)]
pub struct DictionaryCounter {
	entries: HashMap<String, usize>,
	fallback: HeuristicCounter,
}

impl DictionaryCounter {
	/// Creates a dictionary from `(word, syllables)` pairs.
	pub fn from_pairs<I, S>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (S, usize)>,
		S: AsRef<str>,
	{
		let entries = pairs
			.into_iter()
			.map(|(word, count)| (normalize(word.as_ref()), count))
			.collect();
		Self { entries, fallback: HeuristicCounter }
	}

	/// Parses an overrides file.
	///
	/// One `word count` entry per line. Blank lines and lines starting with
	/// `#` are skipped.
	///
	/// # Errors
	/// Returns `HaikuError::InvalidDictionary` with the 1-based line number
	/// if an entry is malformed.
	pub fn parse(contents: &str) -> Result<Self, HaikuError> {
		let mut entries = HashMap::new();

		for (number, line) in contents.lines().enumerate() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}

			let mut fields = line.split_whitespace();
			let (Some(word), Some(count), None) = (fields.next(), fields.next(), fields.next()) else {
				return Err(HaikuError::InvalidDictionary {
					line: number + 1,
					reason: "expected `word count`".to_owned(),
				});
			};
			let count = count.parse::<usize>().map_err(|e| HaikuError::InvalidDictionary {
				line: number + 1,
				reason: format!("bad syllable count `{count}`: {e}"),
			})?;

			entries.insert(normalize(word), count);
		}

		Ok(Self { entries, fallback: HeuristicCounter })
	}

	/// Loads an overrides file from disk.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HaikuError> {
		Self::parse(&read_file(path)?)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl SyllableCounter for DictionaryCounter {
	fn count(&self, word: &str) -> usize {
		match self.entries.get(&normalize(word)) {
			Some(count) => *count,
			None => self.fallback.count(word),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn heuristic_counts_common_words() {
		let counter = HeuristicCounter;
		assert_eq!(counter.count("pond"), 1);
		assert_eq!(counter.count("water"), 2);
		assert_eq!(counter.count("the"), 1);
		assert_eq!(counter.count("make"), 1);
		assert_eq!(counter.count("little"), 2);
		assert_eq!(counter.count("yellow"), 2);
		assert_eq!(counter.count("beautiful"), 3);
	}

	#[test]
	fn heuristic_ignores_case_and_punctuation() {
		let counter = HeuristicCounter;
		assert_eq!(counter.count("Water,"), 2);
		assert_eq!(counter.count("—"), 0);
		assert_eq!(counter.count("..."), 0);
	}

	#[test]
	fn dictionary_overrides_then_falls_back() {
		let counter = DictionaryCounter::from_pairs([("fire", 2), ("Basho", 2)]);
		assert_eq!(counter.count("fire"), 2);
		assert_eq!(counter.count("basho."), 2);
		assert_eq!(counter.count("pond"), 1);
	}

	#[test]
	fn parse_skips_comments_and_blank_lines() {
		let counter = DictionaryCounter::parse("# overrides\n\nfire 2\nhour 2\n").unwrap();
		assert_eq!(counter.len(), 2);
		assert_eq!(counter.count("hour"), 2);
	}

	#[test]
	fn parse_reports_malformed_line() {
		let err = DictionaryCounter::parse("fire 2\nhour\n").unwrap_err();
		assert!(matches!(err, HaikuError::InvalidDictionary { line: 2, .. }));

		let err = DictionaryCounter::parse("fire two\n").unwrap_err();
		assert!(matches!(err, HaikuError::InvalidDictionary { line: 1, .. }));
	}
}
