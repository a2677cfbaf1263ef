use super::*;

#[test]
fn fixed_probe_returns_facts_in_order() {
    let facts = vec![
        MediaFacts {
            audio_duration: 3.0,
            has_media: true,
            ..MediaFacts::default()
        },
        MediaFacts::default(),
    ];
    let probe = FixedProbe::new(facts.clone());
    let beats = vec![Beat::image("a.png"), Beat::image("b.png")];
    assert_eq!(probe_all(&probe, &beats).unwrap(), facts);
}

#[test]
fn fixed_probe_short_list_is_an_invariant_error() {
    let probe = FixedProbe::new(vec![MediaFacts::default()]);
    let beats = vec![Beat::image("a.png"), Beat::image("b.png")];
    assert!(matches!(
        probe_all(&probe, &beats),
        Err(BeatreelError::Invariant(_))
    ));
}

#[test]
fn facts_deserialize_with_defaults() {
    let facts: Vec<MediaFacts> =
        serde_json::from_str(r#"[{ "audio_duration": 2.5, "has_media": true }, {}]"#).unwrap();
    assert_eq!(facts[0].audio_duration, 2.5);
    assert_eq!(facts[0].movie_duration, 0.0);
    assert!(facts[0].has_media);
    assert_eq!(facts[1], MediaFacts::default());
}

#[test]
fn unreadable_image_is_a_probe_error() {
    let beats = vec![
        Beat::voice_over(None),
        Beat::image("target/probe_unit/definitely-missing.png"),
    ];
    match check_still_images(&beats) {
        Err(BeatreelError::Probe { beat, .. }) => assert_eq!(beat, 1),
        other => panic!("unexpected result: {other:?}"),
    }
}
