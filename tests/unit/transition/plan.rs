use super::*;
use crate::timeline::reconcile::ReconciledBeat;
use crate::transition::kind::SlideDir;

fn close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

fn timeline(durations: &[f64]) -> Timeline {
    let mut start_at = 0.0;
    let beats = durations
        .iter()
        .map(|&duration| {
            let b = ReconciledBeat {
                duration,
                start_at,
                silence_duration: 0.0,
            };
            start_at += duration;
            b
        })
        .collect();
    Timeline {
        beats,
        intro_padding: 0.0,
        outro_padding: 0.0,
    }
}

#[test]
fn clamps_to_ninety_percent_of_previous_beat() {
    let t = timeline(&[2.0, 4.0, 10.0]);
    let beats = vec![
        Beat::image("0.png"),
        Beat::image("1.png").with_transition(TransitionKind::Fade, 2.0),
        Beat::image("2.png"),
    ];
    let p = plan(&t, &beats, Fps::default()).unwrap();
    let e = p.entry_for(1).unwrap();
    close(e.first_duration, 1.8);
    close(e.last_duration, 2.0);
    close(e.window(), 1.8);
    assert_eq!(e.prev_visual, 0);
}

#[test]
fn tiny_requests_floor_at_one_frame() {
    let (first, last) = transition_frame_durations(0.01, Some(1.0), 1.0, Fps::default());
    close(first, 1.0 / 30.0);
    close(last, 1.0 / 30.0);
}

#[test]
fn missing_previous_beat_yields_one_frame() {
    let (first, last) = transition_frame_durations(0.5, None, 4.0, Fps::new(25).unwrap());
    close(first, 1.0 / 25.0);
    close(last, 0.5);
}

#[test]
fn frame_flags_follow_transition_kinds() {
    let t = timeline(&[3.0, 3.0, 3.0, 3.0]);
    let beats = vec![
        Beat::image("0.png").with_transition(TransitionKind::Fade, 0.5),
        Beat::image("1.png").with_transition(TransitionKind::SlideIn(SlideDir::Left), 0.5),
        Beat::image("2.png"),
        Beat::image("3.png").with_transition(TransitionKind::SlideOut(SlideDir::Up), 0.5),
    ];
    let p = plan(&t, &beats, Fps::default()).unwrap();

    // A transition on the first beat has nothing to transition from.
    assert!(p.entry_for(0).is_none());
    assert_eq!(p.entries.len(), 2);
    assert_eq!(p.needs_first_frame, vec![false, true, false, false]);
    assert_eq!(p.needs_last_frame, vec![true, false, true, false]);
    assert_eq!(p.entry_after(2).unwrap().beat, 3);
}

#[test]
fn voice_over_groups_transition_from_their_movie() {
    let t = timeline(&[5.0, 2.0, 3.0, 4.0]);
    let beats = vec![
        Beat::movie("m.mp4"),
        Beat::voice_over(None).with_transition(TransitionKind::Fade, 1.0),
        Beat::voice_over(None),
        Beat::image("after.png").with_transition(TransitionKind::Fade, 9.5),
    ];
    let p = plan(&t, &beats, Fps::default()).unwrap();

    assert_eq!(p.entries.len(), 1);
    let e = p.entry_for(3).unwrap();
    assert_eq!(e.prev_visual, 0);
    // previous visual spans the whole group: 5 + 2 + 3
    close(e.first_duration, 9.0);
    close(e.last_duration, 3.6);
    assert_eq!(p.needs_last_frame, vec![true, false, false, false]);
}

#[test]
fn mismatched_inputs_are_rejected() {
    let t = timeline(&[1.0]);
    let beats = vec![Beat::image("0.png"), Beat::image("1.png")];
    assert!(plan(&t, &beats, Fps::default()).is_err());
}
