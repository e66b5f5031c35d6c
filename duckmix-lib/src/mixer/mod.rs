//! Voice-over ducking mixer.

mod timeline;

pub use timeline::mix;

use serde::{Deserialize, Serialize};

use crate::detect::Interval;

const DEFAULT_DELAY_SECONDS: u64 = 5;
const DEFAULT_DUCK_DB: f32 = -10.0;
const DEFAULT_SILENCE_THRESH: f32 = -30.0;
const DEFAULT_MIN_SILENCE_MS: u64 = 500;
const DEFAULT_FADE_IN_MS: u64 = 2000;
const DEFAULT_FADE_OUT_MS: u64 = 2000;
const DEFAULT_POST_VOICE_DURATION_MS: u64 = 10_000;
const DEFAULT_VOICE_BOOST_DB: f32 = 3.0;
const DEFAULT_TRANSITION_MS: u64 = 200;

/// Scalar parameters controlling one mix invocation.
///
/// `silence_thresh` defaults to -30 dBFS here and in the CLI; the HTTP
/// service overrides its own default to -50 dBFS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Voice start delay (seconds).
    pub delay_seconds: u64,
    /// Music gain offset while the voice is active (dB, typically negative).
    pub duck_db: f32,
    /// Silence threshold for speech detection (dBFS).
    pub silence_thresh: f32,
    /// Minimum silence duration separating two speech segments (ms).
    pub min_silence_ms: u64,
    /// Music fade-in at the start of the composite (ms).
    pub fade_in_ms: u64,
    /// Fade-out at the end of the composite (ms).
    pub fade_out_ms: u64,
    /// Music tail kept after the voice ends (ms).
    pub post_voice_duration_ms: u64,
    /// Uniform voice gain applied before detection and overlay (dB).
    pub voice_boost_db: f32,
    /// Duration of the ramps into and out of each ducked region (ms).
    /// Should not exceed half of the shortest speech segment.
    pub transition_ms: u64,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            delay_seconds: DEFAULT_DELAY_SECONDS,
            duck_db: DEFAULT_DUCK_DB,
            silence_thresh: DEFAULT_SILENCE_THRESH,
            min_silence_ms: DEFAULT_MIN_SILENCE_MS,
            fade_in_ms: DEFAULT_FADE_IN_MS,
            fade_out_ms: DEFAULT_FADE_OUT_MS,
            post_voice_duration_ms: DEFAULT_POST_VOICE_DURATION_MS,
            voice_boost_db: DEFAULT_VOICE_BOOST_DB,
            transition_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

/// One detected segment as reported in mix metadata (seconds, 1-indexed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    pub index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub duration_seconds: f64,
}

/// Descriptive metadata for a completed mix.
///
/// Purely informational; nothing here feeds back into processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixMetadata {
    pub voice_duration_seconds: f64,
    pub nonsilent_segments: Vec<SegmentReport>,
    pub total_duration_seconds: f64,
    pub delay_seconds: u64,
    pub duck_db: f32,
    pub voice_boost_db: f32,
}

pub(crate) fn segment_reports(intervals: &[Interval]) -> Vec<SegmentReport> {
    intervals
        .iter()
        .enumerate()
        .map(|(idx, interval)| SegmentReport {
            index: idx + 1,
            start_seconds: interval.start_ms as f64 / 1000.0,
            end_seconds: interval.end_ms as f64 / 1000.0,
            duration_seconds: interval.duration_ms() as f64 / 1000.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: MixSettings = serde_json::from_str("{}").expect("deserialize settings");
        assert_eq!(settings.delay_seconds, 5);
        assert_eq!(settings.duck_db, -10.0);
        assert_eq!(settings.silence_thresh, -30.0);
        assert_eq!(settings.min_silence_ms, 500);
        assert_eq!(settings.fade_in_ms, 2000);
        assert_eq!(settings.fade_out_ms, 2000);
        assert_eq!(settings.post_voice_duration_ms, 10_000);
        assert_eq!(settings.voice_boost_db, 3.0);
        assert_eq!(settings.transition_ms, 200);
    }

    #[test]
    fn settings_deserialize_partial_override() {
        let settings: MixSettings =
            serde_json::from_str(r#"{"duck_db":-6,"transition_ms":100}"#).expect("deserialize");
        assert_eq!(settings.duck_db, -6.0);
        assert_eq!(settings.transition_ms, 100);
        assert_eq!(settings.delay_seconds, 5);
    }

    #[test]
    fn segment_reports_are_one_indexed_seconds() {
        let reports = segment_reports(&[
            Interval { start_ms: 200, end_ms: 1800 },
            Interval { start_ms: 2500, end_ms: 3000 },
        ]);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].index, 1);
        assert!((reports[0].start_seconds - 0.2).abs() < 1e-9);
        assert!((reports[0].end_seconds - 1.8).abs() < 1e-9);
        assert!((reports[0].duration_seconds - 1.6).abs() < 1e-9);
        assert_eq!(reports[1].index, 2);
        assert!((reports[1].start_seconds - 2.5).abs() < 1e-9);
    }

    #[test]
    fn metadata_serializes_expected_fields() {
        let metadata = MixMetadata {
            voice_duration_seconds: 2.0,
            nonsilent_segments: Vec::new(),
            total_duration_seconds: 4.0,
            delay_seconds: 1,
            duck_db: -6.0,
            voice_boost_db: 0.0,
        };
        let json = serde_json::to_value(&metadata).expect("serialize metadata");
        assert_eq!(json["total_duration_seconds"], 4.0);
        assert_eq!(json["delay_seconds"], 1);
        assert!(json["nonsilent_segments"].as_array().unwrap().is_empty());
    }
}
