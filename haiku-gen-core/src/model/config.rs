use crate::error::HaikuError;

/// Syllable targets of the three haiku lines.
pub const HAIKU_TARGETS: [usize; 3] = [5, 7, 5];

/// Largest syllable count accepted for the first word of a haiku.
pub const DEFAULT_MAX_SEED_SYLLABLES: usize = 4;

/// Failed draws tolerated while building one line.
pub const DEFAULT_MAX_RETRIES: usize = 100_000;

/// Parameters of a line generation.
///
/// # Invariants
/// - `max_seed_syllables >= 1`
/// - every line target is strictly greater than `max_seed_syllables`, so a
///   seed word always leaves room for at least one more word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
	/// Seed words above this count are redrawn.
	max_seed_syllables: usize,

	/// Targets for lines 1, 2 and 3.
	line_targets: [usize; 3],

	/// Failed draws allowed per line. `None` retries forever.
	pub max_retries: Option<usize>,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			max_seed_syllables: DEFAULT_MAX_SEED_SYLLABLES,
			line_targets: HAIKU_TARGETS,
			max_retries: Some(DEFAULT_MAX_RETRIES),
		}
	}
}

impl GenerationConfig {
	pub fn max_seed_syllables(&self) -> usize {
		self.max_seed_syllables
	}

	pub fn line_targets(&self) -> [usize; 3] {
		self.line_targets
	}

	/// Target of line `line_number` (1-based).
	pub fn target_of(&self, line_number: usize) -> Option<usize> {
		line_number.checked_sub(1).and_then(|i| self.line_targets.get(i).copied())
	}

	/// Sets the seed cap.
	///
	/// # Errors
	/// Returns an error if the cap is 0 or not below every line target.
	pub fn set_max_seed_syllables(&mut self, max_seed_syllables: usize) -> Result<(), HaikuError> {
		if max_seed_syllables == 0 {
			return Err(HaikuError::InvalidConfig("max seed syllables must be >= 1".to_owned()));
		}
		if let Some(target) = self.line_targets.iter().find(|t| **t <= max_seed_syllables) {
			return Err(HaikuError::InvalidConfig(format!(
				"max seed syllables ({max_seed_syllables}) must be below every line target, got {target}"
			)));
		}
		self.max_seed_syllables = max_seed_syllables;
		Ok(())
	}

	/// Sets the targets of the three lines.
	///
	/// # Errors
	/// Returns an error if a target does not exceed the seed cap.
	pub fn set_line_targets(&mut self, line_targets: [usize; 3]) -> Result<(), HaikuError> {
		if let Some(target) = line_targets.iter().find(|t| **t <= self.max_seed_syllables) {
			return Err(HaikuError::InvalidConfig(format!(
				"line target {target} must be greater than max seed syllables ({})",
				self.max_seed_syllables
			)));
		}
		self.line_targets = line_targets;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_five_seven_five() {
		let config = GenerationConfig::default();
		assert_eq!(config.line_targets(), [5, 7, 5]);
		assert_eq!(config.max_seed_syllables(), 4);
		assert_eq!(config.target_of(2), Some(7));
		assert_eq!(config.target_of(0), None);
		assert_eq!(config.target_of(4), None);
	}

	#[test]
	fn targets_must_exceed_seed_cap() {
		let mut config = GenerationConfig::default();
		assert!(config.set_line_targets([5, 4, 5]).is_err());
		assert_eq!(config.line_targets(), [5, 7, 5]);
		assert!(config.set_line_targets([6, 8, 6]).is_ok());
	}

	#[test]
	fn seed_cap_must_stay_below_targets() {
		let mut config = GenerationConfig::default();
		assert!(config.set_max_seed_syllables(0).is_err());
		assert!(config.set_max_seed_syllables(5).is_err());
		assert!(config.set_max_seed_syllables(2).is_ok());
		assert_eq!(config.max_seed_syllables(), 2);
	}
}
