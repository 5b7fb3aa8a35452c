//! Top-level module for the haiku generation system.
//!
//! This module provides a syllable-constrained Markov chain, including:
//! - First and second order suffix indexes (`SuffixIndex`)
//! - Syllable-bounded line construction (`LineGenerator`)
//! - A cached corpus model (`HaikuModel`)
//! - Generation parameters (`GenerationConfig`)
//! - A high-level generation interface (`HaikuGenerator`)
//! - Cross-line state for interactive use (`HaikuSession`)

/// High-level interface owning a model, a syllable oracle and parameters.
pub mod generator;

/// Corpus plus suffix indexes, with on-disk caching and merging.
pub mod haiku_model;

/// Suffix index builder and syllable-constrained candidate selection.
pub mod suffix_index;

/// Seed selection and the line state machine.
///
/// Lines grow word by word until their syllable total equals the target,
/// drawing fresh random prefixes whenever no continuation fits.
pub mod line_generator;

/// Syllable targets, seed cap and retry ceiling.
pub mod config;

/// Current haiku and boundary carriers for line regeneration.
pub mod session;
