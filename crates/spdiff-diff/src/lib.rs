//! Text diffing engine for stored-procedure comparison
//!
//! Turns two arbitrary text documents into a two-column, line-numbered
//! report: each row tagged unchanged/added/removed/changed, changed rows
//! carrying intraline emphasis spans. Alignment is line-level LCS; wrapping
//! and context collapsing are presentation concerns applied after tagging.
//!
//! Everything in this crate is pure and deterministic: identical inputs
//! produce identical reports.

mod engine;
mod inline;
mod report;
mod wrap;

pub mod html;

pub use engine::render;
pub use report::{ChangeKind, ContextMode, DiffOptions, DiffReport, LineCell, Row, Segment};
pub use wrap::wrap_segments;
