//! Parameter definitions with units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Units (milliseconds, seconds, semitones, Hz)
//! - Documented ranges and meanings
//! - Validation that runs before a session starts

mod audio;
mod music;
mod run;

use log::warn;

// Re-export all types
pub use audio::{audio_constants, MixerConfig, StretchMode};
pub use music::{
    generated_chords, note_label, parse_pitch_class, KeyMode, MusicConfig, NoteSet, Progression,
    ProgressionPreset, NOTE_NAMES,
};
pub use run::{NoteLengthRange, RunConfig};

/// Log a corrected value and keep the message for the user
pub(crate) fn record_correction(corrections: &mut Vec<String>, message: String) {
    warn!("{}", message);
    corrections.push(message);
}
