//! Note synthesis: a bank of pitch-shifted clips derived from one sample.
//!
//! Clips are generated once per (source, offset, stretch mode) and then only
//! read. Generation runs before playback starts, never during a step.

mod clip;
mod resample;
mod store;
mod stretch;
mod wav;

pub use clip::Clip;
pub use resample::{semitone_factor, speedx, stride_indices};
pub use store::{ClipKey, ClipStore, MemoryStore, WavDirStore};
pub use stretch::{optimize_window_size, SpectralStretch};
pub use wav::{load_source, read_clip, write_clip};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::error::Result;
use crate::observer::Observer;
use crate::params::audio_constants::{MAX_OFFSET, MIN_OFFSET};
use crate::params::{note_label, MusicConfig, StretchMode};

/// Base seed for stretch phases; the offset is mixed in per clip
const STRETCH_SEED: u64 = 0x5350_4543_5452_414c;

/// Build the clip for one offset from the decoded source.
///
/// With stretching enabled the source is first stretched by the pitch factor
/// so the resample brings it back to its original duration.
pub fn synthesize(source: &Clip, offset: i32, stretch: StretchMode) -> Clip {
    let factor = semitone_factor(offset);
    let stretched;
    let input = match stretch {
        StretchMode::Off => source,
        StretchMode::On { window_s } => {
            let seed = STRETCH_SEED ^ (offset - MIN_OFFSET) as u64;
            stretched = SpectralStretch::new(window_s).process(source, factor, seed);
            &stretched
        }
    };
    Clip::stereo(speedx(&input.left, factor), speedx(&input.right, factor))
}

/// Lookup of generated clips by semitone offset
pub trait ClipSource {
    fn clip(&self, offset: i32) -> Option<Arc<Clip>>;
}

impl ClipSource for HashMap<i32, Arc<Clip>> {
    fn clip(&self, offset: i32) -> Option<Arc<Clip>> {
        self.get(&offset).cloned()
    }
}

/// Generated clips for one source sample
pub struct NoteBank<S: ClipStore> {
    source_path: PathBuf,
    source: Option<Clip>,
    store: S,
    clips: HashMap<ClipKey, Arc<Clip>>,
    stretched: bool,
    synthesized: usize,
}

impl<S: ClipStore> NoteBank<S> {
    pub fn new(source_path: impl Into<PathBuf>, store: S) -> Self {
        Self {
            source_path: source_path.into(),
            source: None,
            store,
            clips: HashMap::new(),
            stretched: false,
            synthesized: 0,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Clips synthesized by this bank so far (loads from the store do not count)
    pub fn synthesized(&self) -> usize {
        self.synthesized
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make sure every offset used by `music` has a clip in `stretch` mode.
    ///
    /// Offsets already in memory are skipped, offsets in the store are loaded,
    /// the rest are synthesized and saved. Returns how many were synthesized.
    /// Afterwards [`ClipSource::clip`] serves clips of this stretch mode.
    pub fn ensure_notes_generated(
        &mut self,
        music: &MusicConfig,
        stretch: StretchMode,
        observer: &mut dyn Observer,
    ) -> Result<usize> {
        let stretched = stretch.is_enabled();
        self.stretched = stretched;
        info!("Generating notes...");

        let mut generated = 0;
        for offset in MIN_OFFSET..=MAX_OFFSET {
            if !music.note_sets.iter().any(|set| set.contains(offset)) {
                continue;
            }
            let key = ClipKey {
                source: self.source_path.clone(),
                offset,
                stretched,
            };
            if self.clips.contains_key(&key) {
                continue;
            }
            if let Some(clip) = self.store.load(&key)? {
                debug!("Loaded cached clip for offset {}", offset);
                self.clips.insert(key, Arc::new(clip));
                continue;
            }

            let clip = synthesize(self.source()?, offset, stretch);
            self.store.save(&key, &clip)?;
            self.clips.insert(key, Arc::new(clip));
            self.synthesized += 1;
            generated += 1;

            let label = note_label(offset);
            info!("{} Generated!", label);
            observer.note_generated(offset, &label);
        }
        Ok(generated)
    }

    /// Decoded source, loaded on first use
    fn source(&mut self) -> Result<&Clip> {
        match &mut self.source {
            Some(clip) => Ok(&*clip),
            slot => Ok(&*slot.insert(load_source(&self.source_path)?)),
        }
    }
}

impl<S: ClipStore> ClipSource for NoteBank<S> {
    fn clip(&self, offset: i32) -> Option<Arc<Clip>> {
        let key = ClipKey {
            source: self.source_path.clone(),
            offset,
            stretched: self.stretched,
        };
        self.clips.get(&key).cloned()
    }
}
