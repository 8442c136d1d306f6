//! Report data model

use serde::{Deserialize, Serialize};

/// Change category of one physical line row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Unchanged,
    /// Present only on the right side
    Added,
    /// Present only on the left side
    Removed,
    /// Present on both sides with textual differences
    Changed,
}

/// A run of characters within a line, emphasized when it differs from the
/// opposite side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// One side of a row: a 1-based logical line number and the line content as
/// emphasis segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCell {
    pub number: usize,
    pub segments: Vec<Segment>,
}

impl LineCell {
    pub fn new(number: usize, segments: Vec<Segment>) -> Self {
        Self { number, segments }
    }

    pub fn plain(number: usize, text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::plain(text)]
        };
        Self { number, segments }
    }

    /// Full line text with emphasis boundaries flattened away.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One report row: an aligned line pair, or a collapsed run of unchanged
/// lines when context mode is on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Row {
    Line {
        kind: ChangeKind,
        left: Option<LineCell>,
        right: Option<LineCell>,
    },
    Gap {
        /// Count of unchanged line pairs hidden by context collapsing
        skipped: usize,
    },
}

impl Row {
    pub fn kind(&self) -> Option<ChangeKind> {
        match self {
            Row::Line { kind, .. } => Some(*kind),
            Row::Gap { .. } => None,
        }
    }
}

/// The full comparison report. Transient: built for one render, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub rows: Vec<Row>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.rows.iter().filter(|r| r.kind() == Some(kind)).count()
    }

    /// True when no row carries an actual difference.
    pub fn is_identical(&self) -> bool {
        self.rows
            .iter()
            .all(|r| matches!(r.kind(), Some(ChangeKind::Unchanged) | None))
    }
}

/// Whether to show every line or collapse long unchanged runs to a window
/// around each change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextMode {
    Full,
    Collapsed(usize),
}

/// Render options supplied by the shell.
#[derive(Clone, Copy, Debug)]
pub struct DiffOptions {
    /// Column width in characters after which a line soft-wraps to a new
    /// visual row. Presentation only; logical line identity is untouched.
    pub wrap_width: usize,
    pub context: ContextMode,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            wrap_width: 130,
            context: ContextMode::Full,
        }
    }
}
