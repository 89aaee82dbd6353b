//! Polyphonic clip mixer rendered on the audio callback.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::params::MixerConfig;
use crate::synthesis::Clip;

/// One sounding clip
#[derive(Debug, Clone)]
struct Voice {
    clip: Arc<Clip>,
    /// Read position in clip frames
    position: f64,
    /// Clip frames advanced per output frame
    step: f64,
    gain: f32,
    /// Output frames left before the note is cut
    remaining: usize,
}

impl Voice {
    fn is_done(&self) -> bool {
        self.remaining == 0 || self.position >= self.clip.frames() as f64
    }

    /// Next output frame, linearly interpolated between clip frames
    fn next_frame(&mut self) -> Option<[f32; 2]> {
        if self.is_done() {
            return None;
        }
        let index = self.position as usize;
        let frac = (self.position - index as f64) as f32;
        let a = self.clip.frame(index);
        let b = if index + 1 < self.clip.frames() {
            self.clip.frame(index + 1)
        } else {
            a
        };
        self.position += self.step;
        self.remaining -= 1;
        Some([
            (a[0] + (b[0] - a[0]) * frac) * self.gain,
            (a[1] + (b[1] - a[1]) * frac) * self.gain,
        ])
    }
}

/// Sums active voices into the device buffer
#[derive(Debug)]
pub struct Mixer {
    config: MixerConfig,
    device_rate: u32,
    voices: VecDeque<Voice>,
}

impl Mixer {
    pub fn new(config: MixerConfig, device_rate: u32) -> Self {
        Self {
            config,
            device_rate,
            voices: VecDeque::new(),
        }
    }

    /// Voices still sounding
    pub fn active(&self) -> usize {
        self.voices.len()
    }

    /// Start a clip at `gain`, cut after `length`.
    ///
    /// When the voice cap is reached the oldest voice is dropped.
    pub fn trigger(&mut self, clip: Arc<Clip>, gain: f32, length: Duration) {
        if clip.is_empty() {
            return;
        }
        while self.voices.len() >= self.config.max_voices.max(1) {
            self.voices.pop_front();
            debug!("Voice limit reached, dropped oldest voice");
        }
        let step = clip.sample_rate as f64 / self.device_rate as f64;
        let remaining = (length.as_secs_f64() * self.device_rate as f64).round() as usize;
        self.voices.push_back(Voice {
            clip,
            position: 0.0,
            step,
            gain,
            remaining,
        });
    }

    /// Fill an interleaved buffer of `channels` channels.
    ///
    /// Mono devices get the average of both clip channels; channels past the
    /// second repeat left and right alternately.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        if channels == 0 {
            return;
        }
        let limit = self.config.limit;
        for frame in out.chunks_mut(channels) {
            let mut mix = [0.0f32; 2];
            for voice in self.voices.iter_mut() {
                if let Some([l, r]) = voice.next_frame() {
                    mix[0] += l;
                    mix[1] += r;
                }
            }
            let mix = mix.map(|s| s.clamp(-limit, limit));
            if channels == 1 {
                frame[0] = (mix[0] + mix[1]) * 0.5;
            } else {
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = mix[ch % 2];
                }
            }
        }
        self.voices.retain(|v| !v.is_done());
    }
}
