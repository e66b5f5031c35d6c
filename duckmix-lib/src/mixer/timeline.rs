//! Timeline assembly for the ducking mix.

use log::{debug, info, warn};

use super::{segment_reports, MixMetadata, MixSettings};
use crate::clip::AudioClip;
use crate::detect::SilenceDetector;

/// Loop and trim music so it covers the requested total duration.
fn ensure_music_length(music: &AudioClip, total_duration_ms: u64) -> AudioClip {
    let mut bed = music.clone();
    if !music.is_empty() && music.len_ms() < total_duration_ms {
        let copies = total_duration_ms / music.len_ms() + 1;
        for _ in 1..copies {
            bed = bed.append(music);
        }
    }
    bed.slice_ms(0, total_duration_ms)
}

/// Mix `music` under `voice` with dynamic ducking.
///
/// The voice is boosted, its speech-active intervals are detected, and the
/// music is looped/trimmed into a bed spanning
/// `len(voice) + delay + post_voice_duration_ms`. Walking the intervals in
/// order, the bed is copied at full volume between segments, ramped down
/// and held at `duck_db` while the voice is active, and ramped back up
/// after each segment. The delayed voice is then overlaid and the whole
/// composite faded out.
///
/// Detecting no speech is a warning, not an error: the result degrades to
/// the looped, faded bed with the voice overlaid and no ducking, and the
/// returned metadata carries an empty segment list.
pub fn mix(
    music: &AudioClip,
    voice: &AudioClip,
    settings: &MixSettings,
    detector: &dyn SilenceDetector,
) -> (AudioClip, MixMetadata) {
    let boosted_voice = voice.gain_db(settings.voice_boost_db);

    let segments = detector.detect_nonsilent(
        &boosted_voice,
        settings.min_silence_ms,
        settings.silence_thresh,
    );

    if segments.is_empty() {
        warn!("no speech-active segments detected; mixing without ducking (try a higher silence threshold, e.g. -25)");
    }

    let delay_ms = settings.delay_seconds * 1000;
    let total_duration_ms = boosted_voice.len_ms() + delay_ms + settings.post_voice_duration_ms;
    info!(
        "mixing {} ms of voice into a {} ms composite ({} speech segments)",
        boosted_voice.len_ms(),
        total_duration_ms,
        segments.len()
    );

    let bed = ensure_music_length(music, total_duration_ms).fade_in(settings.fade_in_ms);

    let mut mixed = AudioClip::silence(0, bed.sample_rate(), bed.channels());
    let mut current_pos = 0u64;

    for segment in &segments {
        let adj_start = segment.start_ms + delay_ms;
        let adj_end = segment.end_ms + delay_ms;
        debug!("ducking music for [{}, {}) ms", adj_start, adj_end);

        // Full-volume music up to the segment start.
        if current_pos < adj_start {
            mixed = mixed.append(&bed.slice_ms(current_pos, adj_start));
            current_pos = adj_start;
        }

        // Ramp down: the slice carries the duck offset and fades out across
        // its span. The span is not clamped to the segment length, so a
        // segment shorter than two transitions skips its flat body.
        if settings.transition_ms > 0 {
            let transition_end = current_pos + settings.transition_ms;
            let ramp = bed
                .slice_ms(current_pos, transition_end)
                .gain_db(settings.duck_db)
                .fade_out(settings.transition_ms);
            mixed = mixed.append(&ramp);
            current_pos = transition_end;
        }

        // Flat ducked body while the voice is active.
        let duck_end = current_pos.max(adj_end.saturating_sub(settings.transition_ms));
        if duck_end > current_pos {
            mixed = mixed.append(&bed.slice_ms(current_pos, duck_end).gain_db(settings.duck_db));
            current_pos = duck_end;
        }

        // Ramp up: a raw bed slice with a fade-in. The duck offset is not
        // applied to this slice; the ramp rises from silence back to the
        // bed's full level.
        if settings.transition_ms > 0 {
            let transition_end = current_pos + settings.transition_ms;
            let ramp = bed
                .slice_ms(current_pos, transition_end)
                .fade_in(settings.transition_ms);
            mixed = mixed.append(&ramp);
            current_pos = transition_end;
        }
    }

    // Remaining full-volume music through the tail.
    if current_pos < total_duration_ms {
        mixed = mixed.append(&bed.slice_ms(current_pos, total_duration_ms));
    }

    let voice_layer = AudioClip::silence(delay_ms, bed.sample_rate(), bed.channels())
        .append(&boosted_voice);
    let mixed = mixed.overlay(&voice_layer).fade_out(settings.fade_out_ms);

    let metadata = MixMetadata {
        voice_duration_seconds: voice.len_ms() as f64 / 1000.0,
        nonsilent_segments: segment_reports(&segments),
        total_duration_seconds: total_duration_ms as f64 / 1000.0,
        delay_seconds: settings.delay_seconds,
        duck_db: settings.duck_db,
        voice_boost_db: settings.voice_boost_db,
    };

    (mixed, metadata)
}
