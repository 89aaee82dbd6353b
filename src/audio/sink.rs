//! Destinations for triggered notes.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::error::Result;
use crate::synthesis::Clip;

/// Something that can start a note without blocking
pub trait NoteSink {
    /// Start `clip` at `gain` and cut it after `length`. Returns immediately.
    fn trigger(&mut self, clip: Arc<Clip>, gain: f32, length: Duration) -> Result<()>;
}

/// Sink that discards every note, for runs without an audio device
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NoteSink for SilentSink {
    fn trigger(&mut self, clip: Arc<Clip>, gain: f32, length: Duration) -> Result<()> {
        debug!(
            "Silent trigger: {} frames at gain {:.2} for {:?}",
            clip.frames(),
            gain,
            length
        );
        Ok(())
    }
}
