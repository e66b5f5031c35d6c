//! Multipart mix endpoint.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use duckmix_lib::clip::AudioClip;
use duckmix_lib::codec;
use duckmix_lib::detect::RmsDetector;
use duckmix_lib::mixer::{self, MixMetadata, MixSettings};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Default silence threshold for uploads (dBFS). The CLI default is -30;
/// the two entry points carry distinct defaults.
const UPLOAD_SILENCE_THRESH: f32 = -50.0;

/// One uploaded audio part.
struct UploadedTrack {
    file_name: Option<String>,
    data: Vec<u8>,
}

impl UploadedTrack {
    fn extension(&self) -> Option<String> {
        self.file_name.as_deref().and_then(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
        })
    }
}

/// JSON response for a completed mix.
#[derive(Serialize)]
pub struct MixResponse {
    pub message: String,
    pub download_url: String,
    pub metadata: ReportedMetadata,
}

/// Mix metadata plus the generated output file name.
#[derive(Serialize)]
pub struct ReportedMetadata {
    #[serde(flatten)]
    pub mix: MixMetadata,
    pub output_file: String,
}

/// Mix endpoint: accepts `music` and `voice` file parts plus optional text
/// parts for every mix option.
pub async fn mix_endpoint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<MixResponse>> {
    let mut music: Option<UploadedTrack> = None;
    let mut voice: Option<UploadedTrack> = None;
    let mut settings = MixSettings {
        silence_thresh: UPLOAD_SILENCE_THRESH,
        ..MixSettings::default()
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "music" | "voice" => {
                let file_name = field.file_name().map(str::to_owned);
                let data = field.bytes().await?.to_vec();
                if data.is_empty() {
                    return Err(ApiError::bad_request(format!(
                        "file field '{}' is empty",
                        name
                    )));
                }
                let track = UploadedTrack { file_name, data };
                if name == "music" {
                    music = Some(track);
                } else {
                    voice = Some(track);
                }
            }
            _ => apply_option(&mut settings, &name, &field.text().await?)?,
        }
    }

    let music = music.ok_or_else(|| ApiError::bad_request("missing file field 'music'"))?;
    let voice = voice.ok_or_else(|| ApiError::bad_request("missing file field 'voice'"))?;

    let output_file = format!("mix-{}.wav", Uuid::new_v4().simple());
    let output_path = state.config.output_dir.join(&output_file);

    // Decode, mix, and encode are CPU-bound; keep them off the reactor.
    let metadata =
        tokio::task::spawn_blocking(move || run_mix(music, voice, settings, output_path))
            .await
            .map_err(|err| ApiError::internal(err.to_string()))??;

    info!(output = %output_file, "mix ready");

    Ok(Json(MixResponse {
        message: "mix complete".to_string(),
        download_url: format!("/download/{}", output_file),
        metadata: ReportedMetadata {
            mix: metadata,
            output_file,
        },
    }))
}

fn run_mix(
    music: UploadedTrack,
    voice: UploadedTrack,
    settings: MixSettings,
    output_path: PathBuf,
) -> Result<MixMetadata, ApiError> {
    let music_clip = decode_track(music, "music")?;
    let voice_clip = decode_track(voice, "voice")?;

    let (mixed, metadata) = mixer::mix(&music_clip, &voice_clip, &settings, &RmsDetector);

    codec::encode_wav_file(&mixed, &output_path)?;
    Ok(metadata)
}

fn decode_track(track: UploadedTrack, label: &str) -> Result<AudioClip, ApiError> {
    let extension = track.extension();
    codec::decode_bytes(track.data, extension.as_deref())
        .map_err(|err| ApiError::bad_request(format!("could not read {} upload: {}", label, err)))
}

/// Apply one form field to the settings. Unknown fields are ignored.
fn apply_option(settings: &mut MixSettings, name: &str, value: &str) -> Result<(), ApiError> {
    fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ApiError> {
        value.trim().parse().map_err(|_| {
            ApiError::bad_request(format!("invalid value for '{}': {}", name, value))
        })
    }

    match name {
        "delay_seconds" => settings.delay_seconds = parse(name, value)?,
        "duck_db" => settings.duck_db = parse(name, value)?,
        "silence_thresh" => settings.silence_thresh = parse(name, value)?,
        "min_silence_ms" => settings.min_silence_ms = parse(name, value)?,
        "fade_in_ms" => settings.fade_in_ms = parse(name, value)?,
        "fade_out_ms" => settings.fade_out_ms = parse(name, value)?,
        "post_voice_duration" => settings.post_voice_duration_ms = parse(name, value)?,
        "voice_boost_db" => settings.voice_boost_db = parse(name, value)?,
        "transition_ms" => settings.transition_ms = parse(name, value)?,
        _ => {}
    }
    Ok(())
}
