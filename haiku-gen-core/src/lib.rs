//! Markov chain haiku generation library.
//!
//! This crate provides a 5/7/5 haiku generator including:
//! - Corpus tokenization and loading
//! - A pluggable syllable oracle
//! - Word and word-pair suffix indexes built from the corpus
//! - Line generation that never exceeds a line's syllable budget
//! - Sessions that regenerate lines 2 and 3 without touching line 1
//!
//! # Example
//!
//! ```no_run
//! use haiku_gen_core::model::generator::HaikuGenerator;
//! use haiku_gen_core::model::session::HaikuSession;
//! use haiku_gen_core::syllable::HeuristicCounter;
//!
//! let generator = HaikuGenerator::from_file("train.txt", HeuristicCounter)?;
//! let mut session = HaikuSession::new();
//! println!("{}", session.generate(&generator, &mut rand::rng())?);
//! # Ok::<(), haiku_gen_core::error::HaikuError>(())
//! ```

/// Tokenized training text.
pub mod corpus;

/// Error type shared by the whole crate.
pub mod error;

/// Core haiku models and generation logic.
pub mod model;

/// Syllable counting.
pub mod syllable;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use error::HaikuError;
