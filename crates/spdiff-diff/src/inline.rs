//! Character-level intraline diffing for changed line pairs

use similar::{ChangeTag, TextDiff};

use crate::report::Segment;

/// Merges consecutive same-emphasis pushes into one segment.
struct SegmentBuilder {
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push(&mut self, text: &str, emphasized: bool) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.emphasized == emphasized => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                emphasized,
            }),
        }
    }

    fn finish(self) -> Vec<Segment> {
        self.segments
    }
}

/// Compute emphasis segments for a paired changed row.
///
/// Common runs (prefixes, suffixes, shared middles) stay unemphasized on
/// both sides; only the differing spans are marked.
pub(crate) fn inline_segments(old: &str, new: &str) -> (Vec<Segment>, Vec<Segment>) {
    let diff = TextDiff::from_chars(old, new);
    let mut left = SegmentBuilder::new();
    let mut right = SegmentBuilder::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => {
                left.push(change.value(), false);
                right.push(change.value(), false);
            }
            ChangeTag::Delete => left.push(change.value(), true),
            ChangeTag::Insert => right.push(change.value(), true),
        }
    }

    (left.finish(), right.finish())
}
