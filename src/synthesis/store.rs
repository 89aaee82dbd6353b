//! Persistent storage for generated clips.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::clip::Clip;
use super::wav::{read_clip, write_clip};
use crate::error::{Error, Result};

/// Identity of a generated clip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipKey {
    /// Source sample the clip was derived from
    pub source: PathBuf,
    /// Semitone offset from the source pitch
    pub offset: i32,
    /// Whether the clip was time-stretched before resampling
    pub stretched: bool,
}

/// Backend that keeps generated clips between runs
pub trait ClipStore {
    /// Fetch a stored clip, `Ok(None)` if it was never stored
    fn load(&self, key: &ClipKey) -> Result<Option<Clip>>;

    fn save(&mut self, key: &ClipKey, clip: &Clip) -> Result<()>;
}

/// Clips as WAV files next to the source sample.
///
/// `sample.wav` keeps offset 12 in `sample/12.wav`, or in
/// `sample/stretch/12.wav` when stretched.
#[derive(Debug, Clone, Default)]
pub struct WavDirStore;

impl WavDirStore {
    /// Cache directory for a source: its path without the extension
    pub fn cache_dir(source: &Path) -> PathBuf {
        source.with_extension("")
    }

    pub fn clip_path(key: &ClipKey) -> PathBuf {
        let mut path = Self::cache_dir(&key.source);
        if key.stretched {
            path.push("stretch");
        }
        path.push(format!("{}.wav", key.offset));
        path
    }

    /// Delete the whole cache directory for `source`. Returns whether anything was removed.
    pub fn wipe(source: &Path) -> Result<bool> {
        let dir = Self::cache_dir(source);
        if !dir.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        info!("Removed note cache '{}'", dir.display());
        Ok(true)
    }
}

impl ClipStore for WavDirStore {
    fn load(&self, key: &ClipKey) -> Result<Option<Clip>> {
        let path = Self::clip_path(key);
        if !path.is_file() {
            return Ok(None);
        }
        read_clip(&path).map(Some)
    }

    fn save(&mut self, key: &ClipKey, clip: &Clip) -> Result<()> {
        let path = Self::clip_path(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        write_clip(&path, clip)
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    clips: HashMap<ClipKey, Clip>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl ClipStore for MemoryStore {
    fn load(&self, key: &ClipKey) -> Result<Option<Clip>> {
        Ok(self.clips.get(key).cloned())
    }

    fn save(&mut self, key: &ClipKey, clip: &Clip) -> Result<()> {
        self.clips.insert(key.clone(), clip.clone());
        Ok(())
    }
}
