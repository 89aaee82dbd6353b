//! In-memory stereo PCM clip.

use crate::params::audio_constants::CLIP_SAMPLE_RATE;

/// Two channels of 16-bit samples at a known rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub left: Vec<i16>,
    pub right: Vec<i16>,
    pub sample_rate: u32,
}

impl Clip {
    /// Build a clip from two equally long channels at the clip rate
    pub fn stereo(left: Vec<i16>, right: Vec<i16>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self {
            left,
            right,
            sample_rate: CLIP_SAMPLE_RATE,
        }
    }

    /// Duplicate a single channel into both sides
    pub fn mono(samples: Vec<i16>) -> Self {
        Self::stereo(samples.clone(), samples)
    }

    pub fn frames(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Frame `index` as normalized floats
    pub fn frame(&self, index: usize) -> [f32; 2] {
        [
            self.left[index] as f32 / 32768.0,
            self.right[index] as f32 / 32768.0,
        ]
    }

    /// Interleaved L/R samples
    pub fn interleaved(&self) -> impl Iterator<Item = i16> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
    }
}
