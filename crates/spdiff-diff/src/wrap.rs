//! Presentation-time soft wrapping
//!
//! Wrapping happens after tagging: a segment split across visual rows keeps
//! its emphasis flag on every part, so no highlight boundary is lost.

use crate::report::Segment;

/// Split a row's segments into visual rows of at most `width` characters.
///
/// Always yields at least one visual row, even for an empty line. Width is
/// counted in `char`s.
pub fn wrap_segments(segments: &[Segment], width: usize) -> Vec<Vec<Segment>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Segment>> = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut used = 0;

    for segment in segments {
        let mut rest = segment.text.as_str();
        while !rest.is_empty() {
            let room = width - used;
            let take_bytes: usize = rest.chars().take(room).map(char::len_utf8).sum();
            let (head, tail) = rest.split_at(take_bytes);

            used += head.chars().count();
            current.push(Segment {
                text: head.to_string(),
                emphasized: segment.emphasized,
            });
            rest = tail;

            if used == width && !rest.is_empty() {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }
        }
    }

    rows.push(current);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_single_row() {
        let rows = wrap_segments(&[Segment::plain("short")], 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].text, "short");
    }

    #[test]
    fn test_exact_width_single_row() {
        let rows = wrap_segments(&[Segment::plain("0123456789")], 10);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_25_chars_at_width_10_gives_3_rows() {
        let rows = wrap_segments(&[Segment::plain("abcdefghijklmnopqrstuvwxy")], 10);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].text, "abcdefghij");
        assert_eq!(rows[1][0].text, "klmnopqrst");
        assert_eq!(rows[2][0].text, "uvwxy");
    }

    #[test]
    fn test_empty_line_one_empty_row() {
        let rows = wrap_segments(&[], 10);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    }

    #[test]
    fn test_split_preserves_emphasis_on_both_parts() {
        let segments = vec![
            Segment::plain("abcdefgh"),
            Segment::emphasized("XYZ"),
            Segment::plain("tail"),
        ];
        let rows = wrap_segments(&segments, 10);

        assert_eq!(rows.len(), 2);
        // "XYZ" straddles the boundary: "XY" ends row one, "Z" opens row two,
        // both emphasized.
        assert_eq!(rows[0].last().unwrap().text, "XY");
        assert!(rows[0].last().unwrap().emphasized);
        assert_eq!(rows[1][0].text, "Z");
        assert!(rows[1][0].emphasized);
        assert!(!rows[1][1].emphasized);
    }

    #[test]
    fn test_multibyte_chars_counted_as_one() {
        let rows = wrap_segments(&[Segment::plain("ééééé")], 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].text, "ééé");
        assert_eq!(rows[1][0].text, "éé");
    }
}
