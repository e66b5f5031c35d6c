//! Sample-rate and channel-count normalization.

use rubato::{FftFixedIn, Resampler};

use super::CodecError;
use crate::constants::{CHANNELS, SAMPLE_RATE};

const CHUNK_SIZE: usize = 1024;

/// Interleave planar source channels into the internal stereo layout,
/// resampling when the source rate differs from [`SAMPLE_RATE`].
///
/// Sources with fewer channels than the target are repeated across the
/// missing channels; extra source channels are dropped.
pub(super) fn normalize(input: &[Vec<f32>], source_rate: u32) -> Result<Vec<f32>, CodecError> {
    let out_channels = CHANNELS as usize;
    let num_frames = input[0].len();

    if source_rate == SAMPLE_RATE {
        let mut interleaved = Vec::with_capacity(num_frames * out_channels);
        for frame in 0..num_frames {
            for ch in 0..out_channels {
                interleaved.push(input[ch % input.len()][frame]);
            }
        }
        return Ok(interleaved);
    }

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        SAMPLE_RATE as usize,
        CHUNK_SIZE,
        2,
        out_channels,
    )
    .map_err(|err| CodecError::Resample(err.to_string()))?;

    let mut output = Vec::new();
    let mut pos = 0;
    while pos < num_frames {
        let end = (pos + CHUNK_SIZE).min(num_frames);
        let chunk: Vec<Vec<f32>> = (0..out_channels)
            .map(|ch| {
                let source = &input[ch % input.len()];
                let mut data = source[pos..end].to_vec();
                data.resize(CHUNK_SIZE, 0.0);
                data
            })
            .collect();

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|err| CodecError::Resample(err.to_string()))?;

        for frame in 0..resampled[0].len() {
            for ch in 0..out_channels {
                output.push(resampled[ch][frame]);
            }
        }

        pos += CHUNK_SIZE;
    }

    Ok(output)
}
