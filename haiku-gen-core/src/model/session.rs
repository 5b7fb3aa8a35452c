use std::fmt;

use rand::Rng;

use crate::error::HaikuError;
use crate::model::generator::HaikuGenerator;
use crate::model::line_generator::{BoundaryCarrier, LineOutcome};
use crate::syllable::SyllableCounter;

/// Three completed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Haiku {
	lines: [Vec<String>; 3],
}

impl Haiku {
	pub fn lines(&self) -> &[Vec<String>; 3] {
		&self.lines
	}

	/// Words of line `line_number` (1-based).
	pub fn line(&self, line_number: usize) -> Option<&[String]> {
		line_number
			.checked_sub(1)
			.and_then(|i| self.lines.get(i))
			.map(Vec::as_slice)
	}
}

impl fmt::Display for Haiku {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rendered: Vec<String> = self.lines.iter().map(|line| line.join(" ")).collect();
		write!(f, "{}", rendered.join("\n"))
	}
}

/// Current haiku of an interactive session and the carriers needed to
/// regenerate its last two lines.
///
/// # Invariants
/// - `after_first` and `after_second` are empty while `haiku` is `None`
/// - `after_first` always ends line 1 of `haiku`; `after_second` ends the
///   line 2 that line 3 was last generated from
#[derive(Debug, Clone, Default)]
pub struct HaikuSession {
	haiku: Option<Haiku>,
	after_first: BoundaryCarrier,
	after_second: BoundaryCarrier,
}

impl HaikuSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn haiku(&self) -> Option<&Haiku> {
		self.haiku.as_ref()
	}

	/// Carrier produced by line 1 or 2.
	pub fn carrier_after(&self, line_number: usize) -> Option<&BoundaryCarrier> {
		match line_number {
			1 => Some(&self.after_first),
			2 => Some(&self.after_second),
			_ => None,
		}
	}

	/// Forgets the current haiku.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Generates a full haiku, replacing the current one.
	///
	/// On error the previous haiku is kept untouched.
	pub fn generate<C, R>(&mut self, generator: &HaikuGenerator<C>, rng: &mut R) -> Result<&Haiku, HaikuError>
	where
		C: SyllableCounter,
		R: Rng + ?Sized,
	{
		let target = generator.config().line_targets()[0];
		let first = generator.generate_line(rng, &BoundaryCarrier::empty(), target)?;
		self.complete(generator, first, rng)
	}

	/// Generates a full haiku whose first line starts with `first_word`.
	pub fn generate_from<C, R>(
		&mut self,
		generator: &HaikuGenerator<C>,
		first_word: &str,
		rng: &mut R,
	) -> Result<&Haiku, HaikuError>
	where
		C: SyllableCounter,
		R: Rng + ?Sized,
	{
		let target = generator.config().line_targets()[0];
		let first = generator.generate_from_seed(rng, first_word, target)?;
		self.complete(generator, first, rng)
	}

	fn complete<C, R>(
		&mut self,
		generator: &HaikuGenerator<C>,
		first: LineOutcome,
		rng: &mut R,
	) -> Result<&Haiku, HaikuError>
	where
		C: SyllableCounter,
		R: Rng + ?Sized,
	{
		let targets = generator.config().line_targets();
		let second = generator.generate_line(rng, &first.carrier, targets[1])?;
		let third = generator.generate_line(rng, &second.carrier, targets[2])?;

		self.after_first = first.carrier;
		self.after_second = second.carrier;
		Ok(&*self.haiku.insert(Haiku { lines: [first.words, second.words, third.words] }))
	}

	/// Regenerates line 2 or 3 of the current haiku.
	///
	/// Line 2 restarts from the end of line 1 and refreshes the carrier used
	/// by line 3. Line 3 restarts from the end of the last line 2.
	///
	/// # Errors
	/// - `HaikuError::InvalidLine` for any line other than 2 or 3
	/// - `HaikuError::NoHaiku` if no haiku was generated yet; nothing changes
	pub fn regenerate<C, R>(
		&mut self,
		generator: &HaikuGenerator<C>,
		line_number: usize,
		rng: &mut R,
	) -> Result<&Haiku, HaikuError>
	where
		C: SyllableCounter,
		R: Rng + ?Sized,
	{
		if !(2..=3).contains(&line_number) {
			return Err(HaikuError::InvalidLine(line_number));
		}
		let Some(haiku) = self.haiku.as_mut() else {
			return Err(HaikuError::NoHaiku);
		};

		let target = generator.config().line_targets()[line_number - 1];
		if line_number == 2 {
			let outcome = generator.generate_line(rng, &self.after_first, target)?;
			haiku.lines[1] = outcome.words;
			self.after_second = outcome.carrier;
		} else {
			let outcome = generator.generate_line(rng, &self.after_second, target)?;
			haiku.lines[2] = outcome.words;
		}

		Ok(&*haiku)
	}
}
