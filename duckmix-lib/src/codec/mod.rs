//! Container decode/encode for the internal PCM representation.
//!
//! Decoding normalizes every input to the rate and channel count in
//! [`crate::constants`], so the mixer always operates on matched clips.
//! Encoding writes 16-bit PCM WAV; other output containers are not
//! produced.

mod decode;
mod encode;
mod resample;

use std::fmt::{Display, Formatter};

pub use decode::{decode_bytes, decode_file};
pub use encode::encode_wav_file;

/// Error type for audio decode/encode operations.
#[derive(Debug)]
pub enum CodecError {
    Io(std::io::Error),
    Decode(String),
    EmptyStream,
    Resample(String),
    UnsupportedOutput(String),
    Encode(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Decode(err) => write!(f, "decode error: {}", err),
            Self::EmptyStream => write!(f, "decoded stream contains no audio"),
            Self::Resample(err) => write!(f, "resample error: {}", err),
            Self::UnsupportedOutput(ext) => {
                write!(f, "unsupported output container \"{}\" (expected wav)", ext)
            }
            Self::Encode(err) => write!(f, "encode error: {}", err),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
