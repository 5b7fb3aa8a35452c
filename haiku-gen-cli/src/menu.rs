use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use rand::Rng;

use haiku_gen_core::error::HaikuError;
use haiku_gen_core::model::generator::HaikuGenerator;
use haiku_gen_core::model::session::{Haiku, HaikuSession};
use haiku_gen_core::syllable::SyllableCounter;

pub const INTRO: &str = "
    A thousand monkeys at a thousand typewriters...
    or one computer...can sometimes produce a haiku.
";

pub const MENU: &str = "
    Japanese Haiku Generator
    0 - Quit
    1 - Generate a Haiku poem
    2 - Regenerate Line 2
    3 - Regenerate Line 3
";

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
	Quit,
	Generate,
	Regenerate(usize),
}

impl FromStr for MenuChoice {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"0" => Ok(Self::Quit),
			"1" => Ok(Self::Generate),
			"2" => Ok(Self::Regenerate(2)),
			"3" => Ok(Self::Regenerate(3)),
			other => Err(format!("unknown choice `{other}`")),
		}
	}
}

/// Interactive loop over a generator.
///
/// Reads choices from `input` until `0` or end of input. Haikus go to `out`,
/// invalid choices are reported on `err`. A user mistake never ends the loop.
pub struct Menu<'a, C: SyllableCounter> {
	generator: &'a HaikuGenerator<C>,
	session: HaikuSession,
	first_word: Option<String>,
}

impl<'a, C: SyllableCounter> Menu<'a, C> {
	pub fn new(generator: &'a HaikuGenerator<C>) -> Self {
		Self { generator, session: HaikuSession::new(), first_word: None }
	}

	/// Starts every generated haiku with `word`.
	pub fn with_first_word(mut self, word: Option<String>) -> Self {
		self.first_word = word;
		self
	}

	pub fn run<R, I, O, E>(&mut self, rng: &mut R, mut input: I, mut out: O, mut err: E) -> Result<()>
	where
		R: Rng + ?Sized,
		I: BufRead,
		O: Write,
		E: Write,
	{
		writeln!(out, "{INTRO}")?;

		loop {
			writeln!(out, "{MENU}")?;
			write!(out, "Choice: ")?;
			out.flush()?;

			let mut line = String::new();
			if input.read_line(&mut line)? == 0 {
				writeln!(out)?;
				return Ok(());
			}
			writeln!(out)?;

			let choice = match line.parse::<MenuChoice>() {
				Ok(choice) => choice,
				Err(reason) => {
					log::debug!("{reason}");
					writeln!(err, "\nSorry, but that isn't a valid choice.")?;
					continue;
				}
			};

			let result = match choice {
				MenuChoice::Quit => {
					writeln!(out, "Sayonara.")?;
					return Ok(());
				}
				MenuChoice::Generate => match &self.first_word {
					Some(word) => self.session.generate_from(self.generator, word, rng),
					None => self.session.generate(self.generator, rng),
				},
				MenuChoice::Regenerate(line_number) => self.session.regenerate(self.generator, line_number, rng),
			};

			match result {
				Ok(haiku) => write_haiku(&mut out, haiku)?,
				Err(HaikuError::NoHaiku) => writeln!(out, "{}", HaikuError::NoHaiku)?,
				Err(e @ (HaikuError::GenerationFailed { .. } | HaikuError::InvalidSeed { .. })) => {
					log::warn!("generation failed: {e}");
					writeln!(err, "{e}")?;
				}
				Err(e) => return Err(e.into()),
			}
		}
	}
}

fn write_haiku<O: Write>(out: &mut O, haiku: &Haiku) -> Result<()> {
	writeln!(out)?;
	for (label, line) in ["First", "Second", "Third"].iter().zip(haiku.lines()) {
		writeln!(out, "{label} line = {}", line.join(" "))?;
	}
	writeln!(out)?;
	Ok(())
}
