//! Interleaved PCM sample buffer and its timeline operations.

use crate::level::db_to_linear;

/// A decoded stretch of audio: interleaved `f32` frames at a fixed sample
/// rate and channel count.
///
/// Every operation returns a new clip instead of mutating in place, so
/// timeline code can treat intermediate buffers as plain values. Operations
/// that combine two clips expect both to share sample rate and channel
/// count; the codec's normalization policy guarantees this for decoded
/// inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioClip {
    /// Build a clip from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// A silent clip of the given duration.
    pub fn silence(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let frames = (duration_ms * sample_rate as u64 / 1000) as usize;
        Self {
            samples: vec![0.0; frames * channels as usize],
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of whole frames in the clip.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in whole milliseconds.
    pub fn len_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frame index for a millisecond offset, capped at the clip end.
    fn frame_at_ms(&self, ms: u64) -> usize {
        ((ms * self.sample_rate as u64 / 1000) as usize).min(self.frames())
    }

    /// Copy of the `[start_ms, end_ms)` range.
    ///
    /// Offsets past the clip end clamp, so an out-of-range request yields a
    /// shorter (possibly empty) slice rather than an error.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> Self {
        let start = self.frame_at_ms(start_ms) * self.channels as usize;
        let end = self.frame_at_ms(end_ms.max(start_ms)) * self.channels as usize;
        Self {
            samples: self.samples[start..end.max(start)].to_vec(),
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Concatenation of `self` and `other`.
    pub fn append(&self, other: &Self) -> Self {
        let mut samples = Vec::with_capacity(self.samples.len() + other.samples.len());
        samples.extend_from_slice(&self.samples);
        samples.extend_from_slice(&other.samples);
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Apply a uniform gain offset in dB (additive; stacks by amplitude
    /// multiplication).
    pub fn gain_db(&self, db: f32) -> Self {
        let gain = db_to_linear(db);
        let samples = self.samples.iter().map(|&s| s * gain).collect();
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Linear fade from silence over the first `ms` milliseconds.
    pub fn fade_in(&self, ms: u64) -> Self {
        let mut out = self.clone();
        let fade_frames = out.frame_at_ms(ms);
        if fade_frames == 0 {
            return out;
        }
        let channels = out.channels as usize;
        for frame in 0..fade_frames {
            let gain = frame as f32 / fade_frames as f32;
            for sample in &mut out.samples[frame * channels..(frame + 1) * channels] {
                *sample *= gain;
            }
        }
        out
    }

    /// Linear fade to silence over the last `ms` milliseconds.
    pub fn fade_out(&self, ms: u64) -> Self {
        let mut out = self.clone();
        let fade_frames = out.frame_at_ms(ms);
        if fade_frames == 0 {
            return out;
        }
        let channels = out.channels as usize;
        let first = out.frames() - fade_frames;
        for step in 0..fade_frames {
            let gain = (fade_frames - step) as f32 / fade_frames as f32;
            let frame = first + step;
            for sample in &mut out.samples[frame * channels..(frame + 1) * channels] {
                *sample *= gain;
            }
        }
        out
    }

    /// Sample-wise sum of `other` on top of `self`.
    ///
    /// The result keeps this clip's length; any excess of `other` is
    /// dropped.
    pub fn overlay(&self, other: &Self) -> Self {
        let mut out = self.clone();
        let shared = out.samples.len().min(other.samples.len());
        for (sample, &added) in out.samples[..shared].iter_mut().zip(&other.samples[..shared]) {
            *sample += added;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(ms: u64, value: f32) -> AudioClip {
        let clip = AudioClip::silence(ms, 1000, 1);
        AudioClip::new(vec![value; clip.frames()], 1000, 1)
    }

    #[test]
    fn new_drops_partial_frames() {
        let clip = AudioClip::new(vec![0.1, 0.2, 0.3], 44_100, 2);
        assert_eq!(clip.frames(), 1);
        assert_eq!(clip.samples(), &[0.1, 0.2]);
    }

    #[test]
    fn silence_has_requested_duration() {
        let clip = AudioClip::silence(250, 44_100, 2);
        assert_eq!(clip.len_ms(), 250);
        assert!(clip.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn slice_clamps_at_clip_end() {
        let clip = constant(100, 0.5);
        assert_eq!(clip.slice_ms(50, 500).len_ms(), 50);
        assert!(clip.slice_ms(200, 300).is_empty());
        assert!(clip.slice_ms(80, 20).is_empty());
    }

    #[test]
    fn append_concatenates() {
        let joined = constant(40, 0.1).append(&constant(60, 0.2));
        assert_eq!(joined.len_ms(), 100);
        assert_eq!(joined.samples()[39], 0.1);
        assert_eq!(joined.samples()[40], 0.2);
    }

    #[test]
    fn gain_db_scales_amplitude() {
        let clip = constant(10, 0.5).gain_db(-6.0);
        let expected = 0.5 * db_to_linear(-6.0);
        assert!(clip.samples().iter().all(|&s| (s - expected).abs() < 1e-6));
    }

    #[test]
    fn gain_db_offsets_stack() {
        let clip = constant(10, 0.5).gain_db(-10.0).gain_db(-3.0);
        let expected = 0.5 * db_to_linear(-13.0);
        assert!((clip.samples()[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn fade_in_ramps_from_silence() {
        let clip = constant(100, 1.0).fade_in(100);
        assert_eq!(clip.samples()[0], 0.0);
        assert!((clip.samples()[50] - 0.5).abs() < 0.02);
        assert!(clip.samples()[99] > 0.98);
    }

    #[test]
    fn fade_out_ramps_to_silence() {
        let clip = constant(100, 1.0).fade_out(50);
        assert_eq!(clip.samples()[49], 1.0);
        assert_eq!(clip.samples()[50], 1.0);
        assert!((clip.samples()[75] - 0.5).abs() < 0.03);
        assert!(clip.samples()[99] < 0.03);
    }

    #[test]
    fn fade_longer_than_clip_covers_whole_clip() {
        let clip = constant(50, 1.0).fade_in(500);
        assert_eq!(clip.samples()[0], 0.0);
        assert!(clip.samples()[49] < 1.0);
        assert_eq!(clip.len_ms(), 50);
    }

    #[test]
    fn overlay_sums_and_keeps_base_length() {
        let base = constant(100, 0.25);
        let added = constant(40, 0.5);
        let mixed = base.overlay(&added);
        assert_eq!(mixed.len_ms(), 100);
        assert!((mixed.samples()[10] - 0.75).abs() < 1e-6);
        assert!((mixed.samples()[60] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn overlay_drops_excess_of_other() {
        let base = constant(50, 0.1);
        let longer = constant(200, 0.1);
        assert_eq!(base.overlay(&longer).len_ms(), 50);
    }
}
