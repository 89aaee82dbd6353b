//! Phase-randomizing spectral time-stretch.
//!
//! Frames of the input are windowed, their magnitudes kept and phases
//! replaced with random ones, then overlap-added at a wider hop. This smears
//! transients but keeps the spectral envelope, which is what lets a stretched
//! then resampled note keep the source duration without sounding chopped.

use std::f32::consts::TAU;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::clip::Clip;
use crate::params::audio_constants::{CLIP_SAMPLE_RATE, MIN_STRETCH_WINDOW, STRETCH_TAIL_FADE_S};

/// Stretch engine for one window size
pub struct SpectralStretch {
    window_size: usize,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl SpectralStretch {
    /// Create a stretcher with a window of `window_s` seconds.
    ///
    /// The window is at least 16 samples, grown to the next length whose only
    /// prime factors are 2, 3 and 5, and made even.
    pub fn new(window_s: f64) -> Self {
        let requested = ((window_s * CLIP_SAMPLE_RATE as f64) as usize).max(MIN_STRETCH_WINDOW);
        let window_size = optimize_window_size(requested) / 2 * 2;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(window_size);
        let inverse = planner.plan_fft_inverse(window_size);

        Self {
            window_size,
            window: stretch_window(window_size),
            forward,
            inverse,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Stretch `clip` to roughly `factor` times its length.
    ///
    /// Phases come from a generator seeded with `seed`, so the same input,
    /// factor, window and seed always give the same output.
    pub fn process(&self, clip: &Clip, factor: f64, seed: u64) -> Clip {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut channels = [to_float(&clip.left), to_float(&clip.right)];
        for channel in &mut channels {
            fade_tail(channel);
        }

        let n = self.window_size;
        let half = n / 2;
        let nsamples = clip.frames();
        let displace = (n as f64 * 0.5) / factor;

        let mut previous = [vec![0.0f32; n], vec![0.0f32; n]];
        let mut output = [Vec::new(), Vec::new()];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); n];
        let mut start_pos = 0.0f64;

        loop {
            let start = start_pos.floor() as usize;
            for (ch, input) in channels.iter().enumerate() {
                for (k, slot) in buffer.iter_mut().enumerate() {
                    let sample = input.get(start + k).copied().unwrap_or(0.0);
                    *slot = Complex::new(sample * self.window[k], 0.0);
                }
                self.forward.process(&mut buffer);
                randomize_phases(&mut buffer, &mut rng);
                self.inverse.process(&mut buffer);

                let frame: Vec<f32> = buffer
                    .iter()
                    .zip(&self.window)
                    .map(|(c, w)| c.re / n as f32 * w)
                    .collect();
                for k in 0..half {
                    let mixed = frame[k] + previous[ch][half + k];
                    output[ch].push(mixed.clamp(-1.0, 1.0));
                }
                previous[ch] = frame;
            }

            start_pos += displace;
            if start_pos >= nsamples as f64 {
                break;
            }
        }

        let [left, right] = output;
        Clip::stereo(to_pcm(&left), to_pcm(&right))
    }
}

/// Smallest `n >= size` with no prime factors other than 2, 3 and 5
pub fn optimize_window_size(size: usize) -> usize {
    let mut candidate = size.max(1);
    loop {
        let mut rest = candidate;
        for p in [2, 3, 5] {
            while rest % p == 0 {
                rest /= p;
            }
        }
        if rest < 2 {
            return candidate;
        }
        candidate += 1;
    }
}

/// `(1 - x^2)^1.25` over `x` evenly spaced in -1..=1
fn stretch_window(size: usize) -> Vec<f32> {
    let denom = (size.max(2) - 1) as f32;
    (0..size)
        .map(|k| {
            let x = -1.0 + 2.0 * k as f32 / denom;
            (1.0 - x * x).max(0.0).powf(1.25)
        })
        .collect()
}

/// Keep each bin's magnitude with a uniformly random phase.
///
/// The spectrum stays conjugate-symmetric so the inverse transform is real;
/// the DC and Nyquist bins keep only the real part of their rotated value.
fn randomize_phases(spectrum: &mut [Complex<f32>], rng: &mut StdRng) {
    let n = spectrum.len();
    let half = n / 2;
    for k in 0..=half {
        let magnitude = spectrum[k].norm();
        let phase: f32 = rng.gen_range(0.0..TAU);
        if k == 0 || k == half {
            spectrum[k] = Complex::new(magnitude * phase.cos(), 0.0);
        } else {
            let value = Complex::from_polar(magnitude, phase);
            spectrum[k] = value;
            spectrum[n - k] = value.conj();
        }
    }
}

/// Fade the last 50 ms (at least 16 samples) linearly to silence
fn fade_tail(samples: &mut [f32]) {
    let fade = ((CLIP_SAMPLE_RATE as f64 * STRETCH_TAIL_FADE_S) as usize)
        .max(MIN_STRETCH_WINDOW)
        .min(samples.len());
    if fade == 0 {
        return;
    }
    let start = samples.len() - fade;
    let denom = (fade.max(2) - 1) as f32;
    for (k, sample) in samples[start..].iter_mut().enumerate() {
        *sample *= 1.0 - k as f32 / denom;
    }
}

fn to_float(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

fn to_pcm(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| (s * 32767.0) as i16).collect()
}
