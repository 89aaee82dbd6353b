//! WAV loading and clip persistence.

use std::fs;
use std::io::{BufWriter, Read};
use std::path::Path;

use log::info;

use super::clip::Clip;
use super::resample::speedx;
use crate::error::{Error, Result};
use crate::params::audio_constants::{CLIP_BITS, CLIP_CHANNELS, CLIP_SAMPLE_RATE};

/// Load a source sample as a stereo clip at the clip rate.
///
/// Integer PCM of 8, 16, 24 or 32 bits and 32-bit float are accepted. Mono
/// input is duplicated to both channels, channels past the second are
/// dropped, and other sample rates are converted by index striding.
pub fn load_source(path: &Path) -> Result<Clip> {
    let reader = hound::WavReader::open(path).map_err(|e| Error::wav(path, e))?;
    let clip = decode(reader, path)?;
    if clip.sample_rate != CLIP_SAMPLE_RATE {
        info!(
            "Converting '{}' from {} Hz to {} Hz",
            path.display(),
            clip.sample_rate,
            CLIP_SAMPLE_RATE
        );
        let factor = clip.sample_rate as f64 / CLIP_SAMPLE_RATE as f64;
        return Ok(Clip::stereo(
            speedx(&clip.left, factor),
            speedx(&clip.right, factor),
        ));
    }
    Ok(clip)
}

/// Read a clip previously written by [`write_clip`]
pub fn read_clip(path: &Path) -> Result<Clip> {
    let reader = hound::WavReader::open(path).map_err(|e| Error::wav(path, e))?;
    decode(reader, path)
}

/// Write a clip as 16-bit stereo at the clip rate.
///
/// The data goes to a sibling temporary file that is renamed into place, so
/// an interrupted write never leaves a truncated clip behind.
pub fn write_clip(path: &Path, clip: &Clip) -> Result<()> {
    let spec = hound::WavSpec {
        channels: CLIP_CHANNELS,
        sample_rate: CLIP_SAMPLE_RATE,
        bits_per_sample: CLIP_BITS,
        sample_format: hound::SampleFormat::Int,
    };
    let tmp = path.with_extension("wav.tmp");
    let file = fs::File::create(&tmp).map_err(|e| Error::io(&tmp, e))?;
    let mut writer =
        hound::WavWriter::new(BufWriter::new(file), spec).map_err(|e| Error::wav(&tmp, e))?;
    for sample in clip.interleaved() {
        writer
            .write_sample(sample)
            .map_err(|e| Error::wav(&tmp, e))?;
    }
    writer.finalize().map_err(|e| Error::wav(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

fn decode<R: Read>(mut reader: hound::WavReader<R>, path: &Path) -> Result<Clip> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(Error::UnsupportedSample {
            path: path.to_path_buf(),
            reason: "no channels".to_string(),
        });
    }

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 8) => collect(&mut reader, path, |s: i8| (s as i16) << 8)?,
        (hound::SampleFormat::Int, 16) => collect(&mut reader, path, |s: i16| s)?,
        (hound::SampleFormat::Int, 24) => collect(&mut reader, path, |s: i32| (s >> 8) as i16)?,
        (hound::SampleFormat::Int, 32) => collect(&mut reader, path, |s: i32| (s >> 16) as i16)?,
        (hound::SampleFormat::Float, 32) => collect(&mut reader, path, |s: f32| {
            (s.clamp(-1.0, 1.0) * 32767.0) as i16
        })?,
        (format, bits) => {
            return Err(Error::UnsupportedSample {
                path: path.to_path_buf(),
                reason: format!("{:?} samples with {} bits", format, bits),
            })
        }
    };

    let channels = spec.channels as usize;
    let (left, right) = if channels == 1 {
        (samples.clone(), samples)
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| (frame[0], frame[1]))
            .unzip()
    };

    Ok(Clip {
        left,
        right,
        sample_rate: spec.sample_rate,
    })
}

fn collect<R, S, F>(reader: &mut hound::WavReader<R>, path: &Path, convert: F) -> Result<Vec<i16>>
where
    R: Read,
    S: hound::Sample,
    F: Fn(S) -> i16,
{
    reader
        .samples::<S>()
        .map(|s| s.map(&convert).map_err(|e| Error::wav(path, e)))
        .collect()
}
