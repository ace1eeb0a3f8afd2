//! Export functionality for report datasets
//!
//! Provides CSV, PDF, and JSON serialization plus the artifact naming and
//! writing shared by all three.

mod csv;
mod json;
mod pdf;

use self::csv::to_csv;
use self::json::to_json;
use self::pdf::to_pdf;

use crate::error::ReportError;
use crate::types::{Dataset, ReportType};
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Output format of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Json => "JSON",
        }
    }
}

/// Serialized report plus its deterministic file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write into `dir`, creating it if needed. Returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io { path: dir.to_path_buf(), source })?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes).map_err(|source| ReportError::Io { path: path.clone(), source })?;
        debug!("Wrote {} bytes to {:?}", self.bytes.len(), path);
        Ok(path)
    }
}

/// `relatorio_<type>_<YYYY-MM-DD>.<ext>`, dated by the UTC generation date.
pub fn artifact_file_name(report_type: ReportType, format: ExportFormat, generated_at: &DateTime<FixedOffset>) -> String {
    let date = generated_at.with_timezone(&Utc).date_naive();
    format!("relatorio_{}_{}.{}", report_type.as_str(), date.format("%Y-%m-%d"), format.extension())
}

/// Serialize `dataset` in `format`.
pub fn export(dataset: &Dataset, format: ExportFormat) -> Result<ExportArtifact, ReportError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(dataset)?,
        ExportFormat::Pdf => to_pdf(dataset)?,
        ExportFormat::Json => to_json(dataset)?,
    };
    Ok(ExportArtifact { file_name: artifact_file_name(dataset.report_type, format, &dataset.generated_at), bytes })
}
