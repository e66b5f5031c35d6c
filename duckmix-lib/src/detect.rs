//! Speech-activity detection over a voice clip.

use crate::clip::AudioClip;

/// One speech-active region in voice-local time, `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Interval {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Seam for speech-interval detection.
///
/// The mixer only consumes the ordered, non-overlapping interval list, so
/// tests can drive it with a detector returning fixed intervals.
pub trait SilenceDetector {
    /// Ordered, non-overlapping speech-active intervals of `voice`.
    ///
    /// `silence_thresh_dbfs` is the level (dBFS, full scale 1.0) below which
    /// a stretch counts as silent; only silences of at least
    /// `min_silence_ms` separate two intervals.
    fn detect_nonsilent(
        &self,
        voice: &AudioClip,
        min_silence_ms: u64,
        silence_thresh_dbfs: f32,
    ) -> Vec<Interval>;
}

/// Windowed RMS detector.
///
/// A window of `min_silence_ms` slides over the clip in 1 ms steps; windows
/// whose RMS level falls at or below the threshold mark silent ranges,
/// overlapping ranges merge, and the speech intervals are the gaps between
/// merged silences. A clip shorter than the window cannot contain a
/// qualifying silence and is reported as one interval.
pub struct RmsDetector;

impl SilenceDetector for RmsDetector {
    fn detect_nonsilent(
        &self,
        voice: &AudioClip,
        min_silence_ms: u64,
        silence_thresh_dbfs: f32,
    ) -> Vec<Interval> {
        let len_ms = voice.len_ms();
        if len_ms == 0 {
            return Vec::new();
        }

        let min_silence_ms = min_silence_ms.max(1);
        if len_ms < min_silence_ms {
            return vec![Interval {
                start_ms: 0,
                end_ms: len_ms,
            }];
        }

        let silent_ranges = silent_windows(voice, min_silence_ms, silence_thresh_dbfs);

        // Invert the merged silent ranges into speech intervals.
        let mut intervals = Vec::new();
        let mut cursor = 0u64;
        for (start, end) in silent_ranges {
            if start > cursor {
                intervals.push(Interval {
                    start_ms: cursor,
                    end_ms: start,
                });
            }
            cursor = end;
        }
        if cursor < len_ms {
            intervals.push(Interval {
                start_ms: cursor,
                end_ms: len_ms,
            });
        }

        intervals
    }
}

/// Merged `[start_ms, end_ms)` ranges covered by silent trial windows.
fn silent_windows(voice: &AudioClip, window_ms: u64, thresh_dbfs: f32) -> Vec<(u64, u64)> {
    let channels = voice.channels() as usize;
    let samples = voice.samples();
    let frames = voice.frames();
    let sample_rate = voice.sample_rate() as u64;

    // Prefix sums of per-frame energy keep each trial window O(1).
    let mut prefix = vec![0f64; frames + 1];
    for frame in 0..frames {
        let mut energy = 0f64;
        for &sample in &samples[frame * channels..(frame + 1) * channels] {
            energy += sample as f64 * sample as f64;
        }
        prefix[frame + 1] = prefix[frame] + energy;
    }

    let frame_at = |ms: u64| ((ms * sample_rate / 1000) as usize).min(frames);
    let threshold_mean_square = {
        let linear = 10f64.powf(thresh_dbfs as f64 / 20.0);
        linear * linear
    };

    let mut ranges: Vec<(u64, u64)> = Vec::new();
    for start in 0..=(voice.len_ms() - window_ms) {
        let end = start + window_ms;
        let first = frame_at(start);
        let last = frame_at(end);
        let count = (last - first) * channels;
        let mean_square = if count == 0 {
            0.0
        } else {
            (prefix[last] - prefix[first]) / count as f64
        };

        if mean_square <= threshold_mean_square {
            match ranges.last_mut() {
                Some(range) if start <= range.1 => range.1 = end,
                _ => ranges.push((start, end)),
            }
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 kHz mono keeps one frame per millisecond.
    fn clip_from_pattern(pattern: &[(u64, f32)]) -> AudioClip {
        let mut samples = Vec::new();
        for &(ms, value) in pattern {
            samples.extend(std::iter::repeat(value).take(ms as usize));
        }
        AudioClip::new(samples, 1000, 1)
    }

    #[test]
    fn detects_speech_separated_by_silence() {
        let voice = clip_from_pattern(&[(300, 0.5), (200, 0.0), (300, 0.5)]);
        let intervals = RmsDetector.detect_nonsilent(&voice, 100, -30.0);
        assert_eq!(
            intervals,
            vec![
                Interval { start_ms: 0, end_ms: 300 },
                Interval { start_ms: 500, end_ms: 800 },
            ]
        );
    }

    #[test]
    fn short_silence_does_not_split() {
        let voice = clip_from_pattern(&[(300, 0.5), (50, 0.0), (300, 0.5)]);
        let intervals = RmsDetector.detect_nonsilent(&voice, 100, -30.0);
        assert_eq!(intervals, vec![Interval { start_ms: 0, end_ms: 650 }]);
    }

    #[test]
    fn fully_silent_clip_has_no_intervals() {
        let voice = clip_from_pattern(&[(600, 0.0)]);
        assert!(RmsDetector.detect_nonsilent(&voice, 100, -30.0).is_empty());
    }

    #[test]
    fn leading_and_trailing_silence_is_trimmed() {
        let voice = clip_from_pattern(&[(200, 0.0), (300, 0.5), (200, 0.0)]);
        let intervals = RmsDetector.detect_nonsilent(&voice, 100, -30.0);
        assert_eq!(intervals, vec![Interval { start_ms: 200, end_ms: 500 }]);
    }

    #[test]
    fn clip_shorter_than_window_is_one_interval() {
        let voice = clip_from_pattern(&[(80, 0.5)]);
        let intervals = RmsDetector.detect_nonsilent(&voice, 100, -30.0);
        assert_eq!(intervals, vec![Interval { start_ms: 0, end_ms: 80 }]);
    }

    #[test]
    fn empty_clip_has_no_intervals() {
        let voice = AudioClip::new(Vec::new(), 1000, 1);
        assert!(RmsDetector.detect_nonsilent(&voice, 100, -30.0).is_empty());
    }

    #[test]
    fn threshold_controls_sensitivity() {
        // A quiet hum sits around -40 dBFS.
        let voice = clip_from_pattern(&[(300, 0.5), (200, 0.01), (300, 0.5)]);
        let split = RmsDetector.detect_nonsilent(&voice, 100, -30.0);
        assert_eq!(split.len(), 2);
        let merged = RmsDetector.detect_nonsilent(&voice, 100, -50.0);
        assert_eq!(merged.len(), 1);
    }
}
