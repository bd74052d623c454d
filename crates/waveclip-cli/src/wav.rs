//! WAV file reading and writing via `hound`.
//!
//! Input is normalised to f32 in [-1, 1] regardless of sample format and
//! split into two channels; mono files are duplicated to both.

use crate::error::CliError;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Stereo audio in separate channel buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a mono or stereo WAV file.
///
/// Returns the samples, the sample rate and the original channel count.
pub fn read_stereo(path: &Path) -> Result<(StereoSamples, u32, u16), CliError> {
    let read_err = |source| CliError::ReadWav {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.channels > 2 {
        return Err(CliError::ChannelCount(spec.channels));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(read_err)?
        }
    };

    let samples = if spec.channels == 1 {
        StereoSamples {
            left: interleaved.clone(),
            right: interleaved,
        }
    } else {
        let (left, right) = interleaved.chunks_exact(2).map(|frame| (frame[0], frame[1])).unzip();
        StereoSamples { left, right }
    };

    Ok((samples, spec.sample_rate, spec.channels))
}

/// Write a stereo WAV file. 32-bit output is IEEE float, 16 and 24 bit are PCM.
pub fn write_stereo(
    path: &Path,
    samples: &StereoSamples,
    sample_rate: u32,
    bit_depth: u16,
) -> Result<(), CliError> {
    if !matches!(bit_depth, 16 | 24 | 32) {
        return Err(CliError::BitDepth(bit_depth));
    }
    let write_err = |source| CliError::WriteWav {
        path: path.to_path_buf(),
        source,
    };

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;

    let frames = samples.left.iter().zip(&samples.right);
    if bit_depth == 32 {
        for (&l, &r) in frames {
            writer.write_sample(l).map_err(write_err)?;
            writer.write_sample(r).map_err(write_err)?;
        }
    } else {
        let max_val = (1i32 << (bit_depth - 1)) as f32;
        let quantize = |sample: f32| (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (&l, &r) in frames {
            writer.write_sample(quantize(l)).map_err(write_err)?;
            writer.write_sample(quantize(r)).map_err(write_err)?;
        }
    }

    writer.finalize().map_err(write_err)
}
