//! Audio format constants and stretch/mixer configuration.

/// Audio constants shared by synthesis and playback
pub mod audio_constants {
    /// Sample rate of every generated clip (Hz)
    pub const CLIP_SAMPLE_RATE: u32 = 44_100;

    /// Channels in every generated clip (interleaved stereo)
    pub const CLIP_CHANNELS: u16 = 2;

    /// Bits per sample of generated clips
    pub const CLIP_BITS: u16 = 16;

    /// Lowest synthesizable semitone offset (three octaves down)
    pub const MIN_OFFSET: i32 = -36;

    /// Highest synthesizable semitone offset
    pub const MAX_OFFSET: i32 = 59;

    /// Smallest stretch window (samples)
    pub const MIN_STRETCH_WINDOW: usize = 16;

    /// Fade applied to the tail of the stretch input (seconds)
    pub const STRETCH_TAIL_FADE_S: f64 = 0.05;
}

/// Whether clips are time-stretched before being pitch-shifted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StretchMode {
    /// Plain resampling: higher notes are shorter
    #[default]
    Off,
    /// Stretch first so every note keeps the source duration
    On {
        /// Analysis window length (seconds)
        window_s: f64,
    },
}

impl StretchMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, StretchMode::On { .. })
    }
}

/// Output mixer configuration
#[derive(Debug, Clone)]
pub struct MixerConfig {
    /// Maximum simultaneously sounding voices; the oldest voice is dropped
    /// when a new one would exceed this
    pub max_voices: usize,

    /// Hard limiter applied to the mixed signal (linear amplitude)
    pub limit: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            max_voices: 32,
            limit: 1.0,
        }
    }
}

impl MixerConfig {
    /// Validate configuration (at least one voice, positive limiter)
    pub fn validate(&self) -> Result<(), String> {
        if self.max_voices == 0 {
            return Err("Mixer needs at least one voice".to_string());
        }
        if self.limit <= 0.0 || self.limit.is_nan() {
            return Err(format!("Limiter must be positive, got {}", self.limit));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_mode_enabled() {
        assert!(!StretchMode::default().is_enabled());
        assert!(StretchMode::On { window_s: 0.5 }.is_enabled());
    }

    #[test]
    fn test_mixer_config_validate() {
        assert!(MixerConfig::default().validate().is_ok());
        let bad = MixerConfig {
            max_voices: 0,
            ..MixerConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
