//! Line alignment and report construction

use similar::{DiffOp, DiffTag, TextDiff};

use crate::inline::inline_segments;
use crate::report::{ChangeKind, ContextMode, DiffOptions, DiffReport, LineCell, Row};

/// Split on universal newline boundaries: `\r\n`, `\n`, bare `\r`.
///
/// A trailing terminator does not produce an empty final line; an empty
/// document has zero lines.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn unchanged_row(old: &[&str], new: &[&str], i: usize, j: usize) -> Row {
    Row::Line {
        kind: ChangeKind::Unchanged,
        left: Some(LineCell::plain(i + 1, old[i])),
        right: Some(LineCell::plain(j + 1, new[j])),
    }
}

fn removed_row(old: &[&str], i: usize) -> Row {
    Row::Line {
        kind: ChangeKind::Removed,
        left: Some(LineCell::plain(i + 1, old[i])),
        right: None,
    }
}

fn added_row(new: &[&str], j: usize) -> Row {
    Row::Line {
        kind: ChangeKind::Added,
        left: None,
        right: Some(LineCell::plain(j + 1, new[j])),
    }
}

fn emit_op(op: &DiffOp, old: &[&str], new: &[&str], rows: &mut Vec<Row>) {
    match op.tag() {
        DiffTag::Equal => {
            for (i, j) in op.old_range().zip(op.new_range()) {
                rows.push(unchanged_row(old, new, i, j));
            }
        }
        DiffTag::Delete => {
            for i in op.old_range() {
                rows.push(removed_row(old, i));
            }
        }
        DiffTag::Insert => {
            for j in op.new_range() {
                rows.push(added_row(new, j));
            }
        }
        DiffTag::Replace => {
            // Pair modified lines row-by-row up to the shorter run; the
            // surplus degrades to pure removed/added rows.
            let old_range = op.old_range();
            let new_range = op.new_range();
            let paired = old_range.len().min(new_range.len());

            for k in 0..paired {
                let i = old_range.start + k;
                let j = new_range.start + k;
                let (left, right) = inline_segments(old[i], new[j]);
                rows.push(Row::Line {
                    kind: ChangeKind::Changed,
                    left: Some(LineCell::new(i + 1, left)),
                    right: Some(LineCell::new(j + 1, right)),
                });
            }
            for i in old_range.start + paired..old_range.end {
                rows.push(removed_row(old, i));
            }
            for j in new_range.start + paired..new_range.end {
                rows.push(added_row(new, j));
            }
        }
    }
}

/// Produce a comparison report for two documents.
///
/// Either input may be empty; two empty documents yield an empty report.
/// Pure and deterministic: the LCS alignment (Myers) has fixed tie-breaking,
/// so identical inputs always produce identical reports.
pub fn render(text_a: &str, text_b: &str, options: &DiffOptions) -> DiffReport {
    let old = split_lines(text_a);
    let new = split_lines(text_b);
    let diff = TextDiff::from_slices(&old, &new);

    let groups: Vec<Vec<DiffOp>> = match options.context {
        ContextMode::Full => vec![diff.ops().to_vec()],
        ContextMode::Collapsed(context_lines) => diff.grouped_ops(context_lines),
    };

    let mut rows = Vec::new();
    let mut last_old_end = 0;

    for group in &groups {
        if let Some(first) = group.first() {
            let start = first.old_range().start;
            if start > last_old_end {
                rows.push(Row::Gap {
                    skipped: start - last_old_end,
                });
            }
        }
        for op in group {
            emit_op(op, &old, &new, &mut rows);
        }
        if let Some(last) = group.last() {
            last_old_end = last.old_range().end;
        }
    }

    if matches!(options.context, ContextMode::Collapsed(_)) && last_old_end < old.len() {
        rows.push(Row::Gap {
            skipped: old.len() - last_old_end,
        });
    }

    DiffReport { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Segment;
    use crate::wrap_segments;

    fn full() -> DiffOptions {
        DiffOptions::default()
    }

    #[test]
    fn test_split_lines_universal_newlines() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
    }

    #[test]
    fn test_identical_single_line() {
        let report = render("SELECT 1", "SELECT 1", &full());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.count(ChangeKind::Unchanged), 1);
        assert_eq!(report.count(ChangeKind::Added), 0);
        assert_eq!(report.count(ChangeKind::Removed), 0);
        assert_eq!(report.count(ChangeKind::Changed), 0);
        assert!(report.is_identical());
    }

    #[test]
    fn test_trailing_addition() {
        let report = render("SELECT 1", "SELECT 1\nSELECT 2", &full());
        assert_eq!(report.count(ChangeKind::Unchanged), 1);
        assert_eq!(report.count(ChangeKind::Added), 1);

        let added = report
            .rows
            .iter()
            .find(|r| r.kind() == Some(ChangeKind::Added))
            .unwrap();
        match added {
            Row::Line { left, right, .. } => {
                assert!(left.is_none());
                assert_eq!(right.as_ref().unwrap().text(), "SELECT 2");
                assert_eq!(right.as_ref().unwrap().number, 2);
            }
            _ => panic!("expected a line row"),
        }
    }

    #[test]
    fn test_changed_line_highlights_only_difference() {
        let report = render("SELECT a", "SELECT b", &full());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.count(ChangeKind::Changed), 1);

        match &report.rows[0] {
            Row::Line { left, right, .. } => {
                let left = left.as_ref().unwrap();
                let right = right.as_ref().unwrap();
                assert_eq!(left.segments[0], Segment::plain("SELECT "));
                assert_eq!(left.segments[1], Segment::emphasized("a"));
                assert_eq!(right.segments[0], Segment::plain("SELECT "));
                assert_eq!(right.segments[1], Segment::emphasized("b"));
            }
            _ => panic!("expected a line row"),
        }
    }

    #[test]
    fn test_both_empty_is_empty_report() {
        let report = render("", "", &full());
        assert!(report.is_empty());
    }

    #[test]
    fn test_one_side_empty_is_all_added() {
        let report = render("", "SELECT 1\nSELECT 2", &full());
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.count(ChangeKind::Added), 2);

        let report = render("SELECT 1\nSELECT 2", "", &full());
        assert_eq!(report.count(ChangeKind::Removed), 2);
    }

    #[test]
    fn test_wrap_keeps_logical_row_identity() {
        // 25 characters at width 10 render as 3 visual rows of one
        // unchanged logical row.
        let line = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(line.len(), 25);

        let report = render(line, line, &full());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.count(ChangeKind::Unchanged), 1);

        match &report.rows[0] {
            Row::Line { left, .. } => {
                let visual = wrap_segments(&left.as_ref().unwrap().segments, 10);
                assert_eq!(visual.len(), 3);
                let rejoined: String = visual
                    .iter()
                    .flat_map(|row| row.iter().map(|s| s.text.as_str()))
                    .collect();
                assert_eq!(rejoined, line);
            }
            _ => panic!("expected a line row"),
        }
    }

    #[test]
    fn test_idempotent() {
        let a = "CREATE PROC p AS\nSELECT 1\nGO";
        let b = "CREATE PROC p AS\nSELECT 2\nGO";
        let first = render(a, b, &full());
        let second = render(a, b, &full());
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_remove_symmetry() {
        let a = "shared\nonly in a";
        let b = "shared\nonly in b\nalso only in b";

        let forward = render(a, b, &full());
        let backward = render(b, a, &full());

        assert_eq!(
            forward.count(ChangeKind::Added),
            backward.count(ChangeKind::Removed)
        );
        assert_eq!(
            forward.count(ChangeKind::Removed),
            backward.count(ChangeKind::Added)
        );
        assert_eq!(
            forward.count(ChangeKind::Unchanged),
            backward.count(ChangeKind::Unchanged)
        );
    }

    #[test]
    fn test_replace_surplus_degrades_to_added() {
        // Two modified lines against three: pairs two, one pure addition.
        let a = "alpha one\nbeta one";
        let b = "alpha two\nbeta two\ngamma";

        let report = render(a, b, &full());
        assert_eq!(report.count(ChangeKind::Changed), 2);
        assert_eq!(report.count(ChangeKind::Added), 1);
        assert_eq!(report.count(ChangeKind::Removed), 0);
    }

    #[test]
    fn test_context_collapsing_inserts_gaps() {
        let unchanged: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let mut changed = unchanged.clone();
        changed[10] = "line ten".to_string();

        let a = unchanged.join("\n");
        let b = changed.join("\n");
        let options = DiffOptions {
            wrap_width: 130,
            context: ContextMode::Collapsed(3),
        };

        let report = render(&a, &b, &options);

        let gaps: Vec<usize> = report
            .rows
            .iter()
            .filter_map(|r| match r {
                Row::Gap { skipped } => Some(*skipped),
                _ => None,
            })
            .collect();
        assert!(!gaps.is_empty());

        let visible_unchanged = report.count(ChangeKind::Unchanged);
        let hidden: usize = gaps.iter().sum();
        // Every unchanged pair is either shown as context or counted in a gap.
        assert_eq!(visible_unchanged + hidden, 19);
        assert_eq!(report.count(ChangeKind::Changed), 1);
    }

    #[test]
    fn test_collapsed_identical_documents_hide_everything() {
        let text = "a\nb\nc";
        let options = DiffOptions {
            wrap_width: 130,
            context: ContextMode::Collapsed(2),
        };
        let report = render(text, text, &options);
        assert_eq!(report.count(ChangeKind::Unchanged), 0);
        assert_eq!(report.rows, vec![Row::Gap { skipped: 3 }]);
    }
}
