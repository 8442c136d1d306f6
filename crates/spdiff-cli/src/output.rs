//! Colored terminal rendering of a diff report

use console::Style;
use spdiff_diff::{wrap_segments, ChangeKind, DiffReport, LineCell, Row, Segment};

struct RowStyles {
    marker: char,
    base: Style,
    emphasis: Style,
}

fn styles_for(kind: ChangeKind) -> RowStyles {
    match kind {
        ChangeKind::Unchanged => RowStyles {
            marker: ' ',
            base: Style::new(),
            emphasis: Style::new(),
        },
        ChangeKind::Added => RowStyles {
            marker: '+',
            base: Style::new().green(),
            emphasis: Style::new().green().bold(),
        },
        ChangeKind::Removed => RowStyles {
            marker: '-',
            base: Style::new().red(),
            emphasis: Style::new().red().bold(),
        },
        ChangeKind::Changed => RowStyles {
            marker: '~',
            base: Style::new().yellow(),
            emphasis: Style::new().yellow().bold().underlined(),
        },
    }
}

fn styled_text(segments: &[Segment], styles: &RowStyles) -> (String, usize) {
    let mut text = String::new();
    let mut width = 0;
    for segment in segments {
        width += segment.text.chars().count();
        let style = if segment.emphasized {
            &styles.emphasis
        } else {
            &styles.base
        };
        text.push_str(&style.apply_to(&segment.text).to_string());
    }
    (text, width)
}

fn visual_rows(cell: Option<&LineCell>, wrap_width: usize) -> Vec<Vec<Segment>> {
    match cell {
        Some(cell) => wrap_segments(&cell.segments, wrap_width),
        None => vec![Vec::new()],
    }
}

fn number_of(cell: Option<&LineCell>, visual_index: usize) -> String {
    match cell {
        Some(cell) if visual_index == 0 => cell.number.to_string(),
        _ => String::new(),
    }
}

/// Print the report as two aligned, line-numbered columns.
pub fn print_report(report: &DiffReport, title: &str, wrap_width: usize) {
    let dim = Style::new().dim();

    println!("{}", Style::new().bold().apply_to(title));

    for row in &report.rows {
        match row {
            Row::Line { kind, left, right } => {
                let styles = styles_for(*kind);
                let left_rows = visual_rows(left.as_ref(), wrap_width);
                let right_rows = visual_rows(right.as_ref(), wrap_width);
                let height = left_rows.len().max(right_rows.len());
                let empty: Vec<Segment> = Vec::new();

                for k in 0..height {
                    let left_segments = left_rows.get(k).unwrap_or(&empty);
                    let right_segments = right_rows.get(k).unwrap_or(&empty);
                    let (left_text, left_width) = styled_text(left_segments, &styles);
                    let (right_text, _) = styled_text(right_segments, &styles);
                    let pad = " ".repeat(wrap_width.saturating_sub(left_width));
                    let marker = if k == 0 { styles.marker } else { ' ' };

                    println!(
                        "{:>4} {}{} {} {:>4} {}",
                        number_of(left.as_ref(), k),
                        left_text,
                        pad,
                        marker,
                        number_of(right.as_ref(), k),
                        right_text,
                    );
                }
            }
            Row::Gap { skipped } => {
                println!("{}", dim.apply_to(format!("  ... {skipped} unchanged lines ...")));
            }
        }
    }

    let summary = format!(
        "{} added, {} removed, {} changed, {} unchanged",
        report.count(ChangeKind::Added),
        report.count(ChangeKind::Removed),
        report.count(ChangeKind::Changed),
        report.count(ChangeKind::Unchanged),
    );
    println!("{}", dim.apply_to(summary));
}
