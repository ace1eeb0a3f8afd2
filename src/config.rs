/// Configuration resolution module
///
/// This module handles:
/// - Building a ReportRun from CLI arguments
/// - Validating the date window and report type, in the console's order
/// - Resolving the display offset, data path, and output formats
use crate::cli::{CliArgs, FormatChoice};
use crate::error::{ReportError, ValidationError};
use crate::export::ExportFormat;
use crate::locale;
use crate::types::{ReportType, ReportWindow};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use log::debug;
use std::env;
use std::path::PathBuf;

/// Environment variable consulted when `--data` is not given.
pub const DATA_ENV: &str = "DIABREPORT_DATA";

pub const DEFAULT_DATA_PATH: &str = "./dados.json";

/// On-screen preview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    pub page: usize,
    pub page_size: usize,
    pub console_width: Option<usize>,
}

/// Everything one report run needs, resolved and validated up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRun {
    pub report_type: ReportType,
    pub window: ReportWindow,
    pub formats: Vec<ExportFormat>,
    pub output_dir: PathBuf,
    pub data_path: PathBuf,
    /// Offset used to render dates for the reader.
    pub offset: FixedOffset,
    pub generated_at: DateTime<FixedOffset>,
    pub preview: Option<PreviewOptions>,
}

/// Build a complete ReportRun from CLI arguments
///
/// `now` is the generation instant; it also decides which dates count as
/// future. Nothing is fetched until this has succeeded.
pub fn build_report_run(args: &CliArgs, now: DateTime<Utc>) -> Result<ReportRun, ReportError> {
    debug!("Building report run from CLI args");

    let offset = resolve_offset(args.utc_offset.as_deref())?;
    let today = now.with_timezone(&offset).date_naive();
    let window = resolve_window(args.start.as_deref(), args.end.as_deref(), today)?;
    let report_type = args.report_type.ok_or(ValidationError::MissingReportType)?;

    debug!("Report {} for {} to {} (offset {})", report_type, window.start, window.end, offset);

    let data_path = args
        .data
        .clone()
        .or_else(|| env::var_os(DATA_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let preview = args.preview.then_some(PreviewOptions {
        page: args.page,
        page_size: args.page_size,
        console_width: args.console_width,
    });

    Ok(ReportRun {
        report_type,
        window,
        formats: resolve_formats(args.format),
        output_dir: args.output_dir.clone(),
        data_path,
        offset,
        generated_at: now.with_timezone(&offset),
        preview,
    })
}

fn resolve_offset(raw: Option<&str>) -> Result<FixedOffset, ValidationError> {
    match raw {
        Some(text) => locale::parse_utc_offset(text).ok_or_else(|| ValidationError::InvalidOffset(text.to_string())),
        None => Ok(*Local::now().offset()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Window checks: both present, both parse, start <= end, neither after today.
pub fn resolve_window(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<ReportWindow, ValidationError> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ValidationError::MissingDates);
    };

    let start = parse_date(start)?;
    let end = parse_date(end)?;

    if start > end {
        return Err(ValidationError::StartAfterEnd);
    }

    if start > today || end > today {
        return Err(ValidationError::FutureDate);
    }

    Ok(ReportWindow::new(start, end))
}

fn resolve_formats(choice: FormatChoice) -> Vec<ExportFormat> {
    match choice {
        FormatChoice::Csv => vec![ExportFormat::Csv],
        FormatChoice::Pdf => vec![ExportFormat::Pdf],
        FormatChoice::Json => vec![ExportFormat::Json],
        FormatChoice::All => vec![ExportFormat::Csv, ExportFormat::Pdf],
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
