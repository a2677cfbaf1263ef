use super::*;

use super::Link::{Follows, MovieOwner, Owner};

fn g(kind: GroupKind, range: Range<usize>) -> BeatGroup {
    BeatGroup { kind, range }
}

#[test]
fn owners_make_single_groups() {
    assert_eq!(
        group_runs(&[Owner, Owner]),
        vec![g(GroupKind::Single, 0..1), g(GroupKind::Single, 1..2)]
    );
}

#[test]
fn followers_join_their_owner() {
    let links = [
        Owner,
        Follows(GroupKind::Spillover),
        Follows(GroupKind::Spillover),
        Owner,
        Follows(GroupKind::VoiceOver),
        Follows(GroupKind::VoiceOver),
        Owner,
    ];
    assert_eq!(
        group_runs(&links),
        vec![
            g(GroupKind::Spillover, 0..3),
            g(GroupKind::VoiceOver, 3..6),
            g(GroupKind::Single, 6..7),
        ]
    );
}

#[test]
fn leading_followers_form_their_own_group() {
    let links = [Follows(GroupKind::Spillover), Follows(GroupKind::Spillover), Owner];
    assert_eq!(
        group_runs(&links),
        vec![g(GroupKind::Spillover, 0..2), g(GroupKind::Single, 2..3)]
    );
}

#[test]
fn movie_never_owns_a_spillover_run() {
    let links = [
        MovieOwner,
        Follows(GroupKind::Spillover),
        Follows(GroupKind::Spillover),
    ];
    assert_eq!(
        group_runs(&links),
        vec![g(GroupKind::Single, 0..1), g(GroupKind::Spillover, 1..3)]
    );
}

#[test]
fn movie_owns_its_voice_overs_only() {
    let links = [
        MovieOwner,
        Follows(GroupKind::VoiceOver),
        Follows(GroupKind::Spillover),
        Owner,
        Follows(GroupKind::Spillover),
    ];
    assert_eq!(
        group_runs(&links),
        vec![
            g(GroupKind::VoiceOver, 0..2),
            g(GroupKind::Spillover, 2..3),
            g(GroupKind::Spillover, 3..5),
        ]
    );
}

#[test]
fn kind_change_starts_a_new_group() {
    let links = [
        Owner,
        Follows(GroupKind::VoiceOver),
        Follows(GroupKind::Spillover),
    ];
    assert_eq!(
        group_runs(&links),
        vec![g(GroupKind::VoiceOver, 0..2), g(GroupKind::Spillover, 2..3)]
    );
}

#[test]
fn links_follow_beat_kind_and_media() {
    let with_media = MediaFacts {
        has_media: true,
        ..MediaFacts::default()
    };
    let without = MediaFacts::default();

    assert_eq!(link_of(&Beat::movie("m.mp4"), &without), MovieOwner);
    assert_eq!(link_of(&Beat::movie("m.mp4"), &with_media), MovieOwner);
    assert_eq!(
        link_of(&Beat::voice_over(Some(2.0)), &with_media),
        Follows(GroupKind::VoiceOver)
    );
    assert_eq!(link_of(&Beat::image("a.png"), &with_media), Owner);
    assert_eq!(
        link_of(&Beat::image("a.png"), &without),
        Follows(GroupKind::Spillover)
    );
}
