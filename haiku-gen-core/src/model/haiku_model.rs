use std::path::Path;

use serde::{Deserialize, Serialize};

use super::suffix_index::SuffixIndex;
use crate::corpus::Corpus;
use crate::error::HaikuError;
use crate::io::{build_output_path, get_filename};

/// A training corpus together with its suffix indexes.
///
/// This struct manages:
/// - `corpus`: the flattened training text, used for random re-seeding
/// - `index`: first and second order suffix maps built from `corpus`
/// - `corpus_names`: names of the corpus files merged into this model
///
/// Once built, the model is only read. Several corpora can be combined with
/// [`HaikuModel::merge`] before generation starts.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct HaikuModel {
	corpus: Corpus,
	index: SuffixIndex,
	corpus_names: Vec<String>,
}

impl HaikuModel {
	/// Loads a model for a corpus file.
	///
	/// - If `<stem>.bin` exists next to `filepath`, it is decoded with `postcard`.
	/// - Otherwise the text is tokenized, indexed on worker threads, and the
	///   result is written to `<stem>.bin` for the next run.
	///
	/// # Errors
	/// Returns an error if the corpus cannot be read or the cache cannot be
	/// decoded or written.
	pub fn new<P: AsRef<Path>>(filepath: P) -> Result<Self, HaikuError> {
		let binary_data_path = build_output_path(&filepath, "bin")?;
		let mut model: Self;
		if binary_data_path.exists() {
			let bytes = std::fs::read(&binary_data_path)?;
			model = postcard::from_bytes(&bytes)?;
			log::info!("model loaded from cache {}", binary_data_path.display());
		} else {
			model = Self::read_corpus_file(&filepath, &binary_data_path)?;
		}
		model.corpus_names.push(get_filename(&filepath)?);
		Ok(model)
	}

	/// Builds the model of a corpus file and serializes it to `binary_data_path`.
	fn read_corpus_file<PF, PB>(filename: PF, binary_data_path: PB) -> Result<Self, HaikuError>
	where
		PF: AsRef<Path>,
		PB: AsRef<Path>,
	{
		let corpus = Corpus::load(&filename)?;
		let model = Self::from_corpus(corpus);

		let bytes = postcard::to_stdvec(&model)?;
		std::fs::write(&binary_data_path, bytes)?;
		log::info!(
			"model of {} written to {}",
			filename.as_ref().display(),
			binary_data_path.as_ref().display()
		);

		Ok(model)
	}

	/// Indexes an in-memory corpus.
	pub fn from_corpus(corpus: Corpus) -> Self {
		let index = SuffixIndex::build_parallel(&corpus);
		Self { corpus, index, corpus_names: Vec::new() }
	}

	/// Tokenizes and indexes raw text under the given name.
	pub fn from_text(name: &str, raw: &str) -> Self {
		let mut model = Self::from_corpus(Corpus::from_text(raw));
		model.corpus_names.push(name.to_owned());
		model
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn index(&self) -> &SuffixIndex {
		&self.index
	}

	/// Names of the corpora merged into this model, in merge order.
	pub fn get_corpus_names(&self) -> &[String] {
		&self.corpus_names
	}

	/// Merges another model into this one.
	///
	/// The corpora are concatenated and every successor list of `other` is
	/// appended to the matching list of `self`. No pair spanning the two
	/// corpora is recorded.
	pub fn merge(&mut self, other: &Self) {
		self.corpus.extend(&other.corpus);
		self.index.merge(&other.index);
		self.corpus_names.extend(other.corpus_names.iter().cloned());
	}
}
