//! WAV encoding of mixed output.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::CodecError;
use crate::clip::AudioClip;

/// Write a clip as a 16-bit PCM WAV file.
///
/// The output path must carry a `wav` extension; other containers are not
/// encoded. Samples are clamped to [-1, 1] before quantization.
pub fn encode_wav_file(clip: &AudioClip, path: &Path) -> Result<(), CodecError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("wav") => {}
        other => return Err(CodecError::UnsupportedOutput(other.unwrap_or("").to_string())),
    }

    let spec = WavSpec {
        channels: clip.channels(),
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|err| CodecError::Encode(err.to_string()))?;
    for &sample in clip.samples() {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|err| CodecError::Encode(err.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|err| CodecError::Encode(err.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_file;
    use crate::constants::{CHANNELS, SAMPLE_RATE};

    fn test_clip() -> AudioClip {
        let frames = SAMPLE_RATE as usize / 2;
        let mut samples = Vec::with_capacity(frames * CHANNELS as usize);
        for i in 0..frames {
            let value = (i as f32 * 440.0 / SAMPLE_RATE as f32 * std::f32::consts::TAU).sin() * 0.5;
            for _ in 0..CHANNELS {
                samples.push(value);
            }
        }
        AudioClip::new(samples, SAMPLE_RATE, CHANNELS)
    }

    #[test]
    fn encode_writes_expected_wav_spec() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.wav");
        let clip = test_clip();

        encode_wav_file(&clip, &path).expect("encode");

        let reader = hound::WavReader::open(&path).expect("open wav");
        let spec = reader.spec();
        assert_eq!(spec.channels, CHANNELS);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration() as usize, clip.frames());
    }

    #[test]
    fn encode_rejects_non_wav_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.mp3");
        let result = encode_wav_file(&test_clip(), &path);
        assert!(matches!(result, Err(CodecError::UnsupportedOutput(_))));
    }

    #[test]
    fn encoded_wav_decodes_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("roundtrip.wav");
        let clip = test_clip();

        encode_wav_file(&clip, &path).expect("encode");
        let decoded = decode_file(&path).expect("decode");

        assert_eq!(decoded.sample_rate(), SAMPLE_RATE);
        assert_eq!(decoded.channels(), CHANNELS);
        // Same rate and channel count, so no resampling: frame counts match
        // and samples agree within 16-bit quantization error.
        assert_eq!(decoded.frames(), clip.frames());
        for (a, b) in decoded.samples().iter().zip(clip.samples()) {
            assert!((a - b).abs() < 2.0 / i16::MAX as f32);
        }
    }
}
