use super::*;
use crate::foundation::error::BeatreelError;
use crate::script::beat::{Beat, BeatKind};

fn close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

fn audio(seconds: f64) -> MediaFacts {
    MediaFacts {
        audio_duration: seconds,
        has_media: true,
        ..MediaFacts::default()
    }
}

fn movie(movie_duration: f64, audio_duration: f64) -> MediaFacts {
    MediaFacts {
        movie_duration,
        audio_duration,
        has_media: true,
        has_movie_audio: false,
    }
}

fn durations(t: &Timeline) -> Vec<f64> {
    t.beats.iter().map(|b| b.duration).collect()
}

fn silences(t: &Timeline) -> Vec<f64> {
    t.beats.iter().map(|b| b.silence_duration).collect()
}

#[test]
fn movie_length_wins_over_explicit_and_audio() {
    let beats = vec![Beat::movie("m.mp4").with_duration(1.0)];
    let t = reconcile(&beats, &[movie(123.0, 333.0)], &PaddingPolicy::default()).unwrap();
    close(t.beats[0].duration, 123.0);
    close(t.beats[0].silence_duration, 0.0);
}

#[test]
fn movie_beat_gets_movie_plus_padding() {
    let beats = vec![Beat::movie("m.mp4"), Beat::image("end.png")];
    let facts = vec![movie(10.0, 4.0), audio(2.0)];
    let t = reconcile(&beats, &facts, &PaddingPolicy::default()).unwrap();
    // second-to-last beat: closing padding 0.8
    close(t.beats[0].duration, 10.8);
    close(t.beats[0].silence_duration, 6.8);
    close(t.beats[1].duration, 2.0);
}

#[test]
fn beat_without_media_gets_the_floor() {
    for beat in [Beat::image("a.png"), Beat::new(BeatKind::Plain)] {
        let t = reconcile(&[beat], &[MediaFacts::default()], &PaddingPolicy::default()).unwrap();
        close(t.beats[0].duration, 1.0);
        close(t.beats[0].silence_duration, 1.0);
    }
}

#[test]
fn beat_without_media_keeps_explicit_duration() {
    let beats = vec![Beat::new(BeatKind::Plain).with_duration(4.5)];
    let t = reconcile(&beats, &[MediaFacts::default()], &PaddingPolicy::default()).unwrap();
    close(t.beats[0].duration, 4.5);
    close(t.beats[0].silence_duration, 4.5);
}

#[test]
fn padding_follows_position_and_overrides() {
    let beats = vec![
        Beat::image("0.png"),
        Beat::image("1.png"),
        Beat::image("2.png").with_padding(0.0),
        Beat::image("3.png"),
        Beat::image("4.png"),
    ];
    let facts = vec![audio(2.0); 5];
    let t = reconcile(&beats, &facts, &PaddingPolicy::default()).unwrap();
    let d = durations(&t);
    close(d[0], 2.3);
    close(d[1], 2.3);
    close(d[2], 2.0);
    close(d[3], 2.8);
    close(d[4], 2.0);
}

#[test]
fn explicit_zero_padding_is_not_closing_padding() {
    let beats = vec![Beat::image("0.png").with_padding(0.0), Beat::image("1.png")];
    let t = reconcile(&beats, &[audio(3.0), audio(1.0)], &PaddingPolicy::default()).unwrap();
    close(t.beats[0].duration, 3.0);
    close(t.beats[0].silence_duration, 0.0);
}

#[test]
fn explicit_duration_extends_audio_with_silence() {
    let beats = vec![Beat::image("0.png").with_duration(5.0)];
    let t = reconcile(&beats, &[audio(2.0)], &PaddingPolicy::default()).unwrap();
    close(t.beats[0].duration, 5.0);
    close(t.beats[0].silence_duration, 3.0);
}

#[test]
fn start_at_is_cumulative() {
    let beats = vec![
        Beat::image("0.png"),
        Beat::image("1.png"),
        Beat::image("2.png"),
    ];
    let facts = vec![audio(1.0), audio(2.0), audio(3.0)];
    let t = reconcile(&beats, &facts, &PaddingPolicy::none()).unwrap();
    for i in 1..t.len() {
        close(
            t.beats[i].start_at,
            t.beats[i - 1].start_at + t.beats[i - 1].duration,
        );
    }
    close(t.beats[0].start_at, 0.0);
    close(t.beats[2].start_at, 3.0);
}

#[test]
fn spillover_remainder_fills_unspecified_slot() {
    let out = resolve_spillover_group(&[Some(40.0), Some(35.0), None], 90.0);
    let d: Vec<_> = out.iter().map(|s| s.duration).collect();
    assert_eq!(d, vec![40.0, 35.0, 15.0]);
    assert!(out.iter().all(|s| s.silence_duration == 0.0));
}

#[test]
fn spillover_short_audio_keeps_targets_and_reports_silence() {
    let out = resolve_spillover_group(&[Some(40.0), Some(35.0), None], 60.0);
    let d: Vec<_> = out.iter().map(|s| s.duration).collect();
    let s: Vec<_> = out.iter().map(|s| s.silence_duration).collect();
    assert_eq!(d, vec![40.0, 35.0, 1.0]);
    assert_eq!(s, vec![0.0, 15.0, 1.0]);
}

#[test]
fn spillover_excess_audio_goes_to_last_beat() {
    let out = resolve_spillover_group(&[Some(2.0), Some(3.0)], 10.0);
    close(out[0].duration, 2.0);
    close(out[1].duration, 8.0);
    assert!(out.iter().all(|s| s.silence_duration == 0.0));
}

#[test]
fn spillover_splits_evenly_between_unspecified_beats() {
    let out = resolve_spillover_group(&[None, Some(2.0), None], 12.0);
    close(out[0].duration, 5.0);
    close(out[1].duration, 2.0);
    close(out[2].duration, 5.0);
}

#[test]
fn spillover_group_through_reconcile() {
    let beats = vec![
        Beat::image("0.png").with_duration(40.0),
        Beat::image("1.png").with_duration(35.0),
        Beat::image("2.png"),
    ];
    let facts = vec![audio(60.0), MediaFacts::default(), MediaFacts::default()];
    let t = reconcile(&beats, &facts, &PaddingPolicy::default()).unwrap();
    assert_eq!(durations(&t), vec![40.0, 35.0, 1.0]);
    assert_eq!(silences(&t), vec![0.0, 15.0, 1.0]);
    close(t.beats[2].start_at, 75.0);
}

#[test]
fn leading_media_less_beats_share_nothing() {
    let beats = vec![Beat::image("0.png"), Beat::image("1.png"), Beat::image("2.png")];
    let facts = vec![MediaFacts::default(), MediaFacts::default(), audio(2.0)];
    let t = reconcile(&beats, &facts, &PaddingPolicy::none()).unwrap();
    assert_eq!(durations(&t), vec![1.0, 1.0, 2.0]);
    assert_eq!(silences(&t), vec![1.0, 1.0, 0.0]);
}

#[test]
fn voice_over_group_conserves_movie_duration() {
    let members = [
        VoiceOverSlot {
            audio_duration: 5.0,
            start_at: None,
        },
        VoiceOverSlot {
            audio_duration: 45.0,
            start_at: Some(120.0),
        },
        VoiceOverSlot {
            audio_duration: 30.0,
            start_at: None,
        },
    ];
    let out = resolve_voice_over_group(&members, 300.0);
    let d: Vec<_> = out.iter().map(|s| s.duration).collect();
    assert_eq!(d, vec![120.0, 45.0, 135.0]);
    close(d.iter().sum::<f64>(), 300.0);
    close(out[0].silence_duration, 115.0);
    close(out[1].silence_duration, 0.0);
    close(out[2].silence_duration, 105.0);
}

#[test]
fn voice_over_without_start_uses_own_audio() {
    let members = [
        VoiceOverSlot {
            audio_duration: 7.0,
            start_at: None,
        },
        VoiceOverSlot {
            audio_duration: 4.0,
            start_at: None,
        },
    ];
    let out = resolve_voice_over_group(&members, 20.0);
    close(out[0].duration, 7.0);
    close(out[1].duration, 13.0);
}

#[test]
fn voice_over_overrun_clamps_to_zero() {
    let members = [
        VoiceOverSlot {
            audio_duration: 12.0,
            start_at: None,
        },
        VoiceOverSlot {
            audio_duration: 1.0,
            start_at: None,
        },
    ];
    let out = resolve_voice_over_group(&members, 10.0);
    close(out[0].duration, 12.0);
    close(out[1].duration, 0.0);
}

#[test]
fn voice_over_group_through_reconcile() {
    let beats = vec![
        Beat::image("intro.png"),
        Beat::movie("m.mp4"),
        Beat::voice_over(Some(120.0)),
        Beat::voice_over(None),
        Beat::image("outro.png"),
    ];
    let facts = vec![
        audio(2.0),
        movie(300.0, 10.0),
        audio(45.0),
        audio(20.0),
        audio(3.0),
    ];
    let t = reconcile(&beats, &facts, &PaddingPolicy::none()).unwrap();
    assert_eq!(durations(&t), vec![2.0, 120.0, 45.0, 135.0, 3.0]);
    close(t.beats[1..4].iter().map(|b| b.duration).sum::<f64>(), 300.0);
    close(t.beats[4].start_at, 302.0);
}

#[test]
fn reconciling_explicit_output_is_idempotent() {
    let policy = PaddingPolicy::default();
    let first_beats = vec![
        Beat::image("0.png"),
        Beat::image("1.png"),
        Beat::image("2.png"),
        Beat::movie("3.mp4"),
        Beat::voice_over(Some(2.0)),
        Beat::image("5.png"),
        Beat::movie("6.mp4"),
        Beat::image("7.png"),
    ];
    let facts = vec![
        audio(2.0),
        audio(3.0),
        MediaFacts::default(),
        movie(6.0, 1.0),
        audio(3.0),
        MediaFacts::default(),
        movie(4.0, 5.0),
        audio(1.0),
    ];
    let first = reconcile(&first_beats, &facts, &policy).unwrap();
    close(first.beats[0].duration, 2.3);
    close(first.beats[6].duration, 4.8);

    let second_beats: Vec<_> = first_beats
        .iter()
        .zip(&first.beats)
        .map(|(b, r)| b.clone().with_duration(r.duration))
        .collect();
    let second = reconcile(&second_beats, &facts, &policy).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.beats.iter().zip(&second.beats) {
        close(a.duration, b.duration);
        close(a.start_at, b.start_at);
        close(a.silence_duration, b.silence_duration);
    }
}

#[test]
fn explicit_duration_includes_padding() {
    let beats = vec![Beat::image("0.png").with_duration(2.3), Beat::image("1.png")];
    let t = reconcile(&beats, &[audio(2.0), audio(1.0)], &PaddingPolicy::default()).unwrap();
    // closing padding 0.8 is not added on top
    close(t.beats[0].duration, 2.3);
    close(t.beats[0].silence_duration, 0.3);
}

#[test]
fn movie_before_media_less_beat_keeps_its_length() {
    let beats = vec![Beat::movie("m.mp4"), Beat::image("after.png")];
    let facts = vec![movie(10.0, 0.0), MediaFacts::default()];
    let t = reconcile(&beats, &facts, &PaddingPolicy::none()).unwrap();
    assert_eq!(durations(&t), vec![10.0, 1.0]);
    assert_eq!(silences(&t), vec![10.0, 1.0]);
}

#[test]
fn movie_without_media_flag_still_uses_movie_length() {
    let beats = vec![Beat::movie("m.mp4"), Beat::image("end.png")];
    let facts = vec![
        MediaFacts {
            movie_duration: 10.0,
            ..MediaFacts::default()
        },
        audio(2.0),
    ];
    let t = reconcile(&beats, &facts, &PaddingPolicy::default()).unwrap();
    close(t.beats[0].duration, 10.8);
    close(t.beats[1].duration, 2.0);
}

#[test]
fn media_less_beat_after_voice_over_group_stands_alone() {
    let beats = vec![
        Beat::movie("m.mp4"),
        Beat::voice_over(None),
        Beat::image("after.png"),
    ];
    let facts = vec![movie(10.0, 2.0), audio(3.0), MediaFacts::default()];
    let t = reconcile(&beats, &facts, &PaddingPolicy::none()).unwrap();
    assert_eq!(durations(&t), vec![2.0, 8.0, 1.0]);
    close(t.beats[2].silence_duration, 1.0);
}

#[test]
fn length_mismatch_is_an_invariant_violation() {
    let beats = vec![Beat::image("0.png"), Beat::image("1.png")];
    let err = reconcile(&beats, &[audio(1.0)], &PaddingPolicy::default()).unwrap_err();
    assert!(matches!(err, BeatreelError::Invariant(_)));
}

#[test]
fn timeline_helpers_account_for_intro_and_outro() {
    let beats = vec![Beat::image("0.png"), Beat::image("1.png")];
    let policy = PaddingPolicy {
        default_padding: 0.0,
        closing_padding: 0.0,
        intro_padding: 1.0,
        outro_padding: 2.0,
    };
    let t = reconcile(&beats, &[audio(3.0), audio(4.0)], &policy).unwrap();
    close(t.beats_duration(), 7.0);
    close(t.total_duration(), 10.0);
    close(t.playback_start(0), 0.0);
    close(t.playback_start(1), 4.0);
    assert_eq!(t.narration_window(1), (4.0, 8.0));
    assert_eq!(t.narration_window(0), (1.0, 4.0));
}
