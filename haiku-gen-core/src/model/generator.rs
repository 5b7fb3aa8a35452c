use std::path::Path;

use rand::Rng;

use crate::error::HaikuError;
use crate::io;
use crate::model::config::GenerationConfig;
use crate::model::haiku_model::HaikuModel;
use crate::model::line_generator::{BoundaryCarrier, LineGenerator, LineOutcome};
use crate::syllable::SyllableCounter;

/// High-level generator owning a model, a syllable oracle and the
/// generation parameters.
///
/// # Responsibilities
/// - Load one corpus file or every corpus of a folder
/// - Build lines on request, threading boundary carriers supplied by the caller
///
/// The generator itself holds no per-haiku state, see
/// [`HaikuSession`](crate::model::session::HaikuSession) for that.
#[derive(Debug)]
pub struct HaikuGenerator<C: SyllableCounter> {
	model: HaikuModel,
	counter: C,
	config: GenerationConfig,
}

impl<C: SyllableCounter> HaikuGenerator<C> {
	/// Wraps an already loaded model with default parameters.
	pub fn new(model: HaikuModel, counter: C) -> Self {
		Self { model, counter, config: GenerationConfig::default() }
	}

	/// Loads a single corpus file (through its `.bin` cache if present).
	pub fn from_file<P: AsRef<Path>>(filepath: P, counter: C) -> Result<Self, HaikuError> {
		Ok(Self::new(HaikuModel::new(filepath)?, counter))
	}

	/// Loads and merges every `.txt` corpus of a folder.
	///
	/// Both `"folder"` and `"folder/"` are accepted, `"."` is the current
	/// directory. Files are merged in name order.
	///
	/// # Errors
	/// - Returns an error if the path is not a directory or holds no corpus.
	/// - Returns an error if a corpus fails to load.
	pub fn from_folder<P: AsRef<Path>>(folder: P, counter: C) -> Result<Self, HaikuError> {
		let folder = io::normalize_folder(folder.as_ref());
		if !folder.is_dir() {
			return Err(HaikuError::NotADirectory(folder));
		}

		let files = io::list_files(&folder, "txt")?;
		if files.is_empty() {
			return Err(HaikuError::NoCorpus(folder));
		}

		let mut model = HaikuModel::default();
		for file in files {
			model.merge(&HaikuModel::new(folder.join(&file))?);
		}

		Ok(Self::new(model, counter))
	}

	pub fn model(&self) -> &HaikuModel {
		&self.model
	}

	/// Replaces the model, keeping the oracle and parameters.
	pub fn set_model(&mut self, model: HaikuModel) {
		self.model = model;
	}

	pub fn counter(&self) -> &C {
		&self.counter
	}

	pub fn config(&self) -> &GenerationConfig {
		&self.config
	}

	pub fn config_mut(&mut self) -> &mut GenerationConfig {
		&mut self.config
	}

	/// Names of the corpora the model was built from.
	pub fn get_corpus_names(&self) -> &[String] {
		self.model.get_corpus_names()
	}

	/// Borrows the model as a line generator.
	///
	/// # Errors
	/// Returns `HaikuError::CorpusTooSmall` if the model cannot feed a chain.
	pub fn line_generator(&self) -> Result<LineGenerator<'_, C>, HaikuError> {
		LineGenerator::new(self.model.corpus(), self.model.index(), &self.counter, &self.config)
	}

	/// Builds one line of `target` syllables continuing `carrier`.
	pub fn generate_line<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		carrier: &BoundaryCarrier,
		target: usize,
	) -> Result<LineOutcome, HaikuError> {
		self.line_generator()?.generate_line(rng, carrier, target)
	}

	/// Builds a first line of `target` syllables starting with `seed`.
	pub fn generate_from_seed<R: Rng + ?Sized>(
		&self,
		rng: &mut R,
		seed: &str,
		target: usize,
	) -> Result<LineOutcome, HaikuError> {
		self.line_generator()?.generate_from_seed(rng, seed, target)
	}
}
