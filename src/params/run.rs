//! Run parameters: rule, tempo, note lengths, polyphony.

use std::time::Duration;

use rand::Rng;

use super::audio::StretchMode;
use super::record_correction;
use crate::automaton::{Cadence, Rule, DEFAULT_ELEMENTARY_RULE};
use crate::error::ConfigError;

/// Range note lengths are drawn from, inclusive at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLengthRange {
    pub min_ms: u64,
    pub max_ms: u64,
    pub step_ms: u64,
}

impl Default for NoteLengthRange {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            max_ms: 2000,
            step_ms: 500,
        }
    }
}

impl NoteLengthRange {
    /// Draw one of min, min + step, ... up to max, uniformly
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let step = self.step_ms.max(1);
        let count = self.max_ms.saturating_sub(self.min_ms) / step;
        let k = rng.gen_range(0..=count);
        Duration::from_millis(self.min_ms + k * step)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_ms == 0 || self.min_ms > self.max_ms {
            return Err(ConfigError::InvalidNoteLength {
                min: self.min_ms,
                max: self.max_ms,
                step: self.step_ms,
            });
        }
        Ok(())
    }
}

/// Everything the driver needs besides the board, the sample and the music
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rule: Rule,

    /// Override of the rule's own update cadence
    pub cadence: Option<Cadence>,

    /// Full passes over the board
    pub cycles: usize,

    /// Tempo (rows per minute)
    pub bpm: f64,

    pub note_length: NoteLengthRange,

    /// Maximum notes triggered per row
    pub polyphony: usize,

    /// When false, steps advance silently
    pub audible: bool,

    pub stretch: StretchMode,

    /// Values corrected while configuring, as messages for the user
    pub corrections: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rule: Rule::Conway,
            cadence: None,
            cycles: 10,
            bpm: 300.0,
            note_length: NoteLengthRange::default(),
            polyphony: 6,
            audible: true,
            stretch: StretchMode::Off,
            corrections: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Time between row triggers; tempos too slow to express as a
    /// `Duration` are rejected
    pub fn step_interval(&self) -> Result<Duration, ConfigError> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(ConfigError::InvalidTempo(self.bpm));
        }
        Duration::try_from_secs_f64(60.0 / self.bpm)
            .map_err(|_| ConfigError::InvalidTempo(self.bpm))
    }

    /// Cadence actually used for the configured rule
    pub fn cadence(&self) -> Cadence {
        self.cadence.unwrap_or_else(|| self.rule.default_cadence())
    }

    /// Select the rule by name, with `number` for the 1D rule.
    ///
    /// A 1D rule number outside 0..=255 falls back to rule 30 and is
    /// recorded as a correction. Other rules ignore `number`.
    pub fn set_rule(&mut self, name: &str, number: i64) -> Result<(), ConfigError> {
        self.rule = match name.parse::<Rule>()? {
            Rule::Elementary(_) => Rule::Elementary(self.elementary_number(number)),
            rule => rule,
        };
        Ok(())
    }

    fn elementary_number(&mut self, raw: i64) -> u8 {
        match u8::try_from(raw) {
            Ok(number) => number,
            Err(_) => {
                record_correction(
                    &mut self.corrections,
                    format!(
                        "There are only 0-255 rules, got {}; resetting to {}.",
                        raw, DEFAULT_ELEMENTARY_RULE
                    ),
                );
                DEFAULT_ELEMENTARY_RULE
            }
        }
    }

    /// Check fatal problems and clamp correctable ones for a board of `size`.
    pub fn validate(&mut self, size: usize) -> Result<(), ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        self.step_interval()?;
        self.note_length.validate()?;
        if let StretchMode::On { window_s } = self.stretch {
            if !(window_s.is_finite() && window_s > 0.0) {
                return Err(ConfigError::InvalidWindow(window_s));
            }
        }
        let clamped = self.polyphony.clamp(1, size);
        if clamped != self.polyphony {
            record_correction(
                &mut self.corrections,
                format!(
                    "Polyphony {} outside 1..={}, using {}",
                    self.polyphony, size, clamped
                ),
            );
            self.polyphony = clamped;
        }
        Ok(())
    }
}
