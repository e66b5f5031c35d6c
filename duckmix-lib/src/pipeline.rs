//! File-based convenience pipeline: decode, mix, encode.

use std::path::Path;

use log::info;

use crate::codec::{self, CodecError};
use crate::detect::RmsDetector;
use crate::mixer::{self, MixMetadata, MixSettings};

/// Decode both input files, mix them, and write the result as WAV.
///
/// Returns the mix metadata on success.
pub fn mix_files(
    music_path: &Path,
    voice_path: &Path,
    output_path: &Path,
    settings: &MixSettings,
) -> Result<MixMetadata, CodecError> {
    let music = codec::decode_file(music_path)?;
    let voice = codec::decode_file(voice_path)?;

    let (mixed, metadata) = mixer::mix(&music, &voice, settings, &RmsDetector);

    codec::encode_wav_file(&mixed, output_path)?;
    info!("output written to {}", output_path.display());

    Ok(metadata)
}
