//! Error types for configuration, resources and per-step failures.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Problems with run parameters, detected before a run starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Rule name that matches no known rule.
    #[error("invalid rule: '{0}'")]
    InvalidRule(String),

    /// Progression refers to a note-set that does not exist.
    #[error("not enough chords for the progression: index {index} needs {needed} note-sets, {available} configured")]
    NotEnoughNoteSets {
        index: usize,
        needed: usize,
        available: usize,
    },

    #[error("progression is empty")]
    EmptyProgression,

    #[error("no note-sets configured")]
    NoNoteSets,

    #[error("note-set {0} is empty")]
    EmptyNoteSet(usize),

    /// Semitone offset outside the synthesizable span.
    #[error("semitone offset {offset} outside {min}..={max}")]
    OffsetOutOfRange { offset: i32, min: i32, max: i32 },

    #[error("board size must be at least 1")]
    EmptyBoard,

    /// Board rows are not all `size` cells long.
    #[error("board is not square: row {row} has {len} cells, expected {size}")]
    BoardShape { row: usize, len: usize, size: usize },

    #[error("invalid board cell '{0}'")]
    BoardCell(char),

    #[error("tempo must be a positive number of beats per minute, got {0}")]
    InvalidTempo(f64),

    #[error("invalid note length range: min {min} ms, max {max} ms, step {step} ms")]
    InvalidNoteLength { min: u64, max: u64, step: u64 },

    #[error("stretch window must be positive, got {0} s")]
    InvalidWindow(f64),

    #[error("unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    #[error("could not parse note list '{0}'")]
    NoteList(String),
}

/// Errors that can occur while building or running a session.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O failure on a specific path.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// WAV decoding or encoding failure.
    #[error("WAV error on '{}': {source}", path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// Source sample is readable but not something we can pitch-shift.
    #[error("unsupported sample '{}': {reason}", path.display())]
    UnsupportedSample { path: PathBuf, reason: String },

    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// A step referenced an offset that has no generated clip.
    #[error("no clip generated for semitone offset {offset}")]
    MissingClip { offset: i32 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Wav {
            path: path.into(),
            source,
        }
    }

    /// Whether the driver may skip the rest of the cycle and carry on.
    ///
    /// Only per-step playback failures qualify; configuration and resource
    /// errors abort the run.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::MissingClip { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_clip_is_transient() {
        assert!(Error::MissingClip { offset: 3 }.is_transient());
        assert!(!Error::from(ConfigError::EmptyProgression).is_transient());
        assert!(!Error::AudioOutput("gone".into()).is_transient());
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = ConfigError::NotEnoughNoteSets {
            index: 4,
            needed: 5,
            available: 1,
        };
        assert!(err.to_string().contains("not enough chords"));

        let err = Error::io("cache/12.wav", std::io::Error::other("disk full"));
        assert!(err.to_string().contains("cache/12.wav"));
        assert!(err.to_string().contains("disk full"));
    }
}
