//! Symphonia-based decoding into an [`AudioClip`].

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use log::warn;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::resample::normalize;
use super::CodecError;
use crate::clip::AudioClip;
use crate::constants::{CHANNELS, SAMPLE_RATE};

fn convert_signed_32bit_to_f32(sample: i32) -> f32 {
    sample as f32 / 2f32.powi(31)
}

fn convert_unsigned_32bit_to_f32(sample: u32) -> f32 {
    let shifted_sample = sample as i64 - 2i64.pow(31);
    shifted_sample as f32 / 2f32.powi(31)
}

fn convert_signed_24bit_to_f32(sample: i32) -> f32 {
    let shifted_sample = sample << 8 >> 8;
    shifted_sample as f32 / 2f32.powi(23)
}

fn convert_unsigned_24bit_to_f32(sample: u32) -> f32 {
    let shifted_sample = sample as i32 - 2i32.pow(23);
    shifted_sample as f32 / 2f32.powi(23)
}

fn convert_signed_16bit_to_f32(sample: i16) -> f32 {
    sample as f32 / 2f32.powi(15)
}

fn convert_unsigned_16bit_to_f32(sample: u16) -> f32 {
    let shifted_sample = sample as i32 - 2i32.pow(15);
    shifted_sample as f32 / 2f32.powi(15)
}

fn convert_signed_8bit_to_f32(sample: i8) -> f32 {
    sample as f32 / 2f32.powi(7)
}

fn convert_unsigned_8bit_to_f32(sample: u8) -> f32 {
    let shifted_sample = sample as i16 - 2i16.pow(7);
    shifted_sample as f32 / 2f32.powi(7)
}

/// Decode an audio file into a normalized clip.
pub fn decode_file(path: &Path) -> Result<AudioClip, CodecError> {
    let file = File::open(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_owned);
    decode_source(Box::new(file), extension.as_deref())
}

/// Decode an in-memory audio payload (e.g. an upload body).
///
/// `extension` is a probe hint taken from the original file name, if any.
pub fn decode_bytes(data: Vec<u8>, extension: Option<&str>) -> Result<AudioClip, CodecError> {
    decode_source(Box::new(Cursor::new(data)), extension)
}

fn decode_source(
    source: Box<dyn MediaSource>,
    extension: Option<&str>,
) -> Result<AudioClip, CodecError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = extension {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| CodecError::Decode(format!("unsupported format: {}", err)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| CodecError::Decode("no supported audio track".to_string()))?;
    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| CodecError::Decode("unknown sample rate".to_string()))?;
    let source_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    if source_channels == 0 {
        return Err(CodecError::Decode("track reports zero channels".to_string()));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| CodecError::Decode(format!("unsupported codec: {}", err)))?;

    let mut planar: Vec<Vec<f32>> = vec![Vec::new(); source_channels];
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(CodecError::Decode(err.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => push_frames(&decoded, &mut planar),
            Err(Error::DecodeError(err)) => {
                // Corrupt packets are skipped, not fatal.
                warn!("decode error: {}", err);
            }
            Err(err) => return Err(CodecError::Decode(err.to_string())),
        }
    }

    if planar[0].is_empty() {
        return Err(CodecError::EmptyStream);
    }

    let samples = normalize(&planar, sample_rate)?;
    Ok(AudioClip::new(samples, SAMPLE_RATE, CHANNELS))
}

/// Append one decoded packet's frames to the planar channel buffers.
fn push_frames(decoded: &AudioBufferRef<'_>, planar: &mut [Vec<f32>]) {
    let channels = planar.len();
    match decoded {
        AudioBufferRef::U8(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_unsigned_8bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::U16(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_unsigned_16bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::U24(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_unsigned_24bit_to_f32(buf.chan(ch % available)[frame].0));
                }
            }
        }
        AudioBufferRef::U32(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_unsigned_32bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::S8(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_signed_8bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_signed_16bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::S24(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_signed_24bit_to_f32(buf.chan(ch % available)[frame].0));
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(convert_signed_32bit_to_f32(buf.chan(ch % available)[frame]));
                }
            }
        }
        AudioBufferRef::F32(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(buf.chan(ch % available)[frame]);
                }
            }
        }
        AudioBufferRef::F64(buf) => {
            let available = buf.spec().channels.count();
            for frame in 0..buf.frames() {
                for ch in 0..channels {
                    planar[ch].push(buf.chan(ch % available)[frame] as f32);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_cover_sample_range() {
        assert!((convert_signed_16bit_to_f32(i16::MAX) - 1.0).abs() < 1e-3);
        assert!((convert_signed_16bit_to_f32(i16::MIN) + 1.0).abs() < 1e-6);
        assert_eq!(convert_signed_16bit_to_f32(0), 0.0);

        assert_eq!(convert_unsigned_16bit_to_f32(1 << 15), 0.0);
        assert!((convert_unsigned_16bit_to_f32(u16::MAX) - 1.0).abs() < 1e-3);

        assert_eq!(convert_unsigned_8bit_to_f32(128), 0.0);
        assert!((convert_signed_8bit_to_f32(i8::MIN) + 1.0).abs() < 1e-6);

        assert_eq!(convert_unsigned_24bit_to_f32(1 << 23), 0.0);
        assert!((convert_signed_24bit_to_f32(-(1 << 23)) + 1.0).abs() < 1e-6);

        assert_eq!(convert_unsigned_32bit_to_f32(1 << 31), 0.0);
        assert!((convert_signed_32bit_to_f32(i32::MIN) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn decode_missing_file_is_io_error() {
        let result = decode_file(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(CodecError::Io(_))));
    }

    #[test]
    fn decode_garbage_bytes_is_decode_error() {
        let result = decode_bytes(vec![0u8; 64], Some("mp3"));
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
