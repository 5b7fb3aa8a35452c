use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the haiku generation library.
///
/// Lookup misses and over-budget candidates are not errors: the line
/// generator resolves them locally by drawing again. Only conditions the
/// caller has to act on end up here.
#[derive(Debug, Error)]
pub enum HaikuError {
	/// Reading a corpus, dictionary or cache file failed.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// A cached model could not be encoded or decoded.
	#[error("model cache error: {0}")]
	Decode(#[from] postcard::Error),

	/// The corpus cannot feed a Markov chain of order 2.
	#[error("corpus too small: {words} words, at least 3 are required")]
	CorpusTooSmall { words: usize },

	/// A line of a syllable overrides file is malformed.
	#[error("invalid dictionary entry at line {line}: {reason}")]
	InvalidDictionary { line: usize, reason: String },

	/// A generation parameter is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// The retry ceiling was reached before the line hit its target.
	#[error("could not build a {target}-syllable line after {attempts} attempts")]
	GenerationFailed { target: usize, attempts: usize },

	/// No corpus word fits under the seed syllable cap.
	#[error("no seed word of at most {max_syllables} syllables found after {attempts} attempts")]
	SeedNotFound { max_syllables: usize, attempts: usize },

	/// A caller supplied first word does not leave room for the rest of the line.
	#[error("seed word `{word}` has {syllables} syllables, at most {max_syllables} allowed")]
	InvalidSeed { word: String, syllables: usize, max_syllables: usize },

	/// A line was regenerated before any haiku was generated.
	#[error("Please generate a full haiku first (Option 1).")]
	NoHaiku,

	/// Only lines 2 and 3 can be regenerated.
	#[error("line {0} cannot be regenerated, expected 2 or 3")]
	InvalidLine(usize),

	/// A corpus folder was expected.
	#[error("expected a directory, got: {}", .0.display())]
	NotADirectory(PathBuf),

	/// A folder contained no corpus file.
	#[error("no corpus found in {}", .0.display())]
	NoCorpus(PathBuf),
}
