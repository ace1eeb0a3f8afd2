//! Dataset assembly - project, de-duplicate and order one report run's records.

use super::projection::RowProjector;
use crate::types::{Dataset, ProjectedRow, RawRecord, ReportType, ReportWindow};
use chrono::{DateTime, FixedOffset};
use log::debug;
use std::collections::HashSet;

/// Build the dataset for one report run.
///
/// Records are expected to be pre-filtered by the source; the users role guard
/// is re-applied here so an admin document can never reach a users report.
/// Rows are ordered newest-created first (stable; records without a timestamp
/// count as the epoch and end up last), then stripped of the timestamp.
pub fn assemble(
    report_type: ReportType,
    records: &[RawRecord],
    window: ReportWindow,
    generated_at: DateTime<FixedOffset>,
) -> Dataset {
    let projector = RowProjector::new(report_type, *generated_at.offset());

    let mut seen = HashSet::new();
    let mut dropped_role = 0usize;
    let mut dropped_duplicate = 0usize;

    let mut projected: Vec<ProjectedRow> = Vec::with_capacity(records.len());
    for record in records {
        if report_type == ReportType::Users && record.text("role") != "user" {
            dropped_role += 1;
            continue;
        }
        if !record.id.is_empty() && !seen.insert(record.id.as_str()) {
            dropped_duplicate += 1;
            continue;
        }
        projected.push(projector.project(record));
    }

    if dropped_role > 0 || dropped_duplicate > 0 {
        debug!(
            "Assembling {} report: dropped {} non-user and {} duplicate records",
            report_type, dropped_role, dropped_duplicate
        );
    }

    sort_newest_first(&mut projected);

    Dataset {
        report_type,
        window,
        generated_at,
        rows: projected.into_iter().map(ProjectedRow::into_row).collect(),
    }
}

/// Stable descending sort on creation time in milliseconds; missing timestamps sort as zero.
pub fn sort_newest_first(rows: &mut [ProjectedRow]) {
    rows.sort_by_key(|row| std::cmp::Reverse(row.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)));
}
