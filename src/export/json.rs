//! JSON export functionality
//!
//! Machine-readable companion to the CSV/PDF artifacts.

use crate::error::ReportError;
use crate::labels;
use crate::types::{Dataset, ReportType, ReportWindow, Row};
use serde::Serialize;

/// Serialized straight from the dataset so row keys keep column order.
#[derive(Serialize)]
struct JsonReport<'a> {
    report_type: ReportType,
    title: &'static str,
    window: ReportWindow,
    generated_at: String,
    total: usize,
    columns: &'static [&'static str],
    rows: &'a [Row],
}

/// Pretty-printed JSON document describing the whole dataset.
pub fn to_json(dataset: &Dataset) -> Result<Vec<u8>, ReportError> {
    let document = JsonReport {
        report_type: dataset.report_type,
        title: labels::report_type_label(dataset.report_type),
        window: dataset.window,
        generated_at: dataset.generated_at.to_rfc3339(),
        total: dataset.len(),
        columns: dataset.columns(),
        rows: &dataset.rows,
    };

    serde_json::to_vec_pretty(&document).map_err(|e| ReportError::export("JSON", e))
}
