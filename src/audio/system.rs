//! Audio output through the default cpal device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info};

use super::mixer::Mixer;
use super::sink::NoteSink;
use crate::error::{Error, Result};
use crate::params::MixerConfig;
use crate::synthesis::Clip;

/// Audio system owning the output stream and its mixer
pub struct AudioSystem {
    /// Mixer shared with the audio callback
    mixer: Arc<Mutex<Mixer>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start streaming silence
    pub fn new(mixer_config: MixerConfig) -> Result<Self> {
        mixer_config
            .validate()
            .map_err(|e| Error::AudioOutput(format!("Invalid mixer config: {}", e)))?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("No audio output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get audio config: {}", e)))?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let mixer = Arc::new(Mutex::new(Mixer::new(mixer_config, sample_rate)));
        let mixer_clone = Arc::clone(&mixer);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match mixer_clone.lock() {
                    Ok(mut mixer) => mixer.render(data, channels),
                    Err(_) => data.fill(0.0),
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start audio stream: {}", e)))?;

        Ok(Self {
            mixer,
            _stream: stream,
        })
    }
}

impl NoteSink for AudioSystem {
    fn trigger(&mut self, clip: Arc<Clip>, gain: f32, length: Duration) -> Result<()> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| Error::AudioOutput("Mixer lock poisoned".to_string()))?;
        mixer.trigger(clip, gain, length);
        debug!("{} voices sounding", mixer.active());
        Ok(())
    }
}
