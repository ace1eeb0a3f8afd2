//! Report module - from raw store documents to a sized, ordered dataset.
//!
//! This module handles:
//! - Projecting raw documents into flat rows (labels, derived fields)
//! - Assembling the per-run dataset (role guard, de-duplication, ordering)
//! - Allocating column widths against a fixed budget
//!
//! Serialization to files lives in the `export` module; console rendering in
//! `console_format`.
//!
//! # Module Organization
//!
//! - `projection` - Per-report-type row projection
//! - `dataset` - Dataset assembly and ordering
//! - `widths` - Column width baselines and allocation

mod dataset;
mod projection;
mod widths;

pub use dataset::assemble;
pub use widths::{PDF_TABLE_WIDTH_MM, allocate};
