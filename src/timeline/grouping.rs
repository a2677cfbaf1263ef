use std::ops::Range;

use crate::probe::MediaFacts;
use crate::script::beat::{Beat, BeatKind};

/// How a run of beats shares timing resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// One beat on its own.
    Single,
    /// One owned audio asset spread over the following media-less beats.
    Spillover,
    /// A movie narrated by the following voice-over beats.
    VoiceOver,
}

/// A run of consecutive beats resolved together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeatGroup {
    pub kind: GroupKind,
    pub range: Range<usize>,
}

/// Relation of a beat to the beat before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Link {
    /// Starts a new group that any follower may join.
    Owner,
    /// Starts a new group that only voice-over beats may join: a movie's length is its own.
    MovieOwner,
    /// Joins the current group if it is (or can become) of this kind.
    Follows(GroupKind),
}

impl Link {
    fn accepts(self, follower: GroupKind) -> bool {
        match self {
            Link::Owner => true,
            Link::MovieOwner => follower == GroupKind::VoiceOver,
            Link::Follows(kind) => kind == follower,
        }
    }
}

/// Movies always own their group; voice-overs follow; media-less beats spill over.
pub(crate) fn link_of(beat: &Beat, facts: &MediaFacts) -> Link {
    match beat.kind {
        BeatKind::VoiceOver(_) => Link::Follows(GroupKind::VoiceOver),
        BeatKind::Movie(_) => Link::MovieOwner,
        _ if facts.has_media => Link::Owner,
        _ => Link::Follows(GroupKind::Spillover),
    }
}

/// Single grouping scan shared by spillover and voice-over resolution.
///
/// A follower run with no owner in front of it (e.g. media-less beats at the start of the
/// script, or after a movie) forms its own group of the follower's kind.
pub(crate) fn group_runs(links: &[Link]) -> Vec<BeatGroup> {
    let mut groups: Vec<BeatGroup> = Vec::new();
    let mut head = Link::Owner;
    for (i, link) in links.iter().copied().enumerate() {
        let extend = match (link, groups.last()) {
            (Link::Follows(kind), Some(cur)) => {
                cur.kind == kind || (cur.kind == GroupKind::Single && head.accepts(kind))
            }
            _ => false,
        };

        if extend {
            let Some(cur) = groups.last_mut() else {
                continue;
            };
            if let Link::Follows(kind) = link {
                cur.kind = kind;
            }
            cur.range.end = i + 1;
            continue;
        }

        let kind = match link {
            Link::Owner | Link::MovieOwner => GroupKind::Single,
            Link::Follows(kind) => kind,
        };
        head = link;
        groups.push(BeatGroup {
            kind,
            range: i..i + 1,
        });
    }
    groups
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/grouping.rs"]
mod tests;
