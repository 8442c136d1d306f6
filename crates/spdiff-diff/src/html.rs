//! Self-contained HTML rendering of a diff report
//!
//! Two-column, line-numbered table with the tool's color palette embedded,
//! so the output file needs no external assets.

use crate::report::{ChangeKind, DiffReport, LineCell, Row, Segment};
use crate::wrap::wrap_segments;

const STYLE: &str = "\
    table.diff {\n\
        font-family: 'Consolas', 'Monaco', 'Courier New', monospace;\n\
        font-size: 13px;\n\
        width: 100%;\n\
        border-collapse: collapse;\n\
        border: 1px solid #ddd;\n\
        table-layout: fixed;\n\
    }\n\
    table.diff td {\n\
        padding: 2px 5px;\n\
        vertical-align: top;\n\
        word-wrap: break-word;\n\
    }\n\
    .diff_header {\n\
        background-color: #f7f7f7;\n\
        color: #999;\n\
        text-align: right;\n\
        width: 30px;\n\
    }\n\
    .diff_add { background-color: #e6ffec; color: #1a1a1a; }\n\
    .diff_add span { background-color: #acf2db; font-weight: bold; }\n\
    .diff_sub { background-color: #ffebe9; color: #1a1a1a; }\n\
    .diff_sub span { background-color: #fdb8c0; text-decoration: line-through; }\n\
    .diff_chg { background-color: #fffbdd; color: #1a1a1a; }\n\
    .diff_chg span { background-color: #fceea6; font-weight: bold; }\n\
    .diff_gap { background-color: #f7f7f7; color: #999; text-align: center; }\n";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn cell_class(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Unchanged => "",
        ChangeKind::Added => "diff_add",
        ChangeKind::Removed => "diff_sub",
        ChangeKind::Changed => "diff_chg",
    }
}

fn render_segments(visual_rows: &[Vec<Segment>]) -> String {
    let mut html = String::new();
    for (index, row) in visual_rows.iter().enumerate() {
        if index > 0 {
            html.push_str("<br>");
        }
        for segment in row {
            if segment.emphasized {
                html.push_str("<span>");
                html.push_str(&escape(&segment.text));
                html.push_str("</span>");
            } else {
                html.push_str(&escape(&segment.text));
            }
        }
    }
    html
}

fn render_cell(out: &mut String, cell: Option<&LineCell>, kind: ChangeKind, wrap_width: usize) {
    match cell {
        Some(cell) => {
            let class = cell_class(kind);
            out.push_str(&format!("<td class=\"diff_header\">{}</td>", cell.number));
            let visual = wrap_segments(&cell.segments, wrap_width);
            if class.is_empty() {
                out.push_str(&format!("<td>{}</td>", render_segments(&visual)));
            } else {
                out.push_str(&format!(
                    "<td class=\"{}\">{}</td>",
                    class,
                    render_segments(&visual)
                ));
            }
        }
        None => out.push_str("<td class=\"diff_header\"></td><td></td>"),
    }
}

/// Render the report as a complete HTML page.
///
/// Pure function of the report and wrap width; identical inputs produce
/// byte-identical pages.
pub fn render_page(report: &DiffReport, title: &str, wrap_width: usize) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(title)));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&format!("<h3>{}</h3>\n", escape(title)));
    out.push_str("<table class=\"diff\">\n");

    for row in &report.rows {
        out.push_str("<tr>");
        match row {
            Row::Line { kind, left, right } => {
                render_cell(&mut out, left.as_ref(), *kind, wrap_width);
                render_cell(&mut out, right.as_ref(), *kind, wrap_width);
            }
            Row::Gap { skipped } => {
                out.push_str(&format!(
                    "<td class=\"diff_gap\" colspan=\"4\">&hellip; {skipped} unchanged lines &hellip;</td>"
                ));
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}
