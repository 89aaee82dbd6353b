//! Sonomata library - a cellular automaton played through a pitch-shifted sample

pub mod audio;
pub mod automaton;
pub mod cli;
pub mod error;
pub mod observer;
pub mod params;
pub mod playback;
pub mod session;
pub mod synthesis;
pub mod view;

pub use error::{ConfigError, Error, Result};
