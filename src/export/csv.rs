//! CSV export functionality
//!
//! Semicolon-delimited, CRLF-terminated, UTF-8 with a byte-order mark so
//! spreadsheet tools in pt-BR locales split columns and show accents correctly.

use crate::error::ReportError;
use crate::labels::column_label;
use crate::locale;
use crate::types::Dataset;
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const CSV_DELIMITER: u8 = b';';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render the full dataset (never a page of it) as CSV bytes.
///
/// Layout: BOM, header row of column labels, one line per row, a blank line,
/// and the quoted generation footer with no trailing line break.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>, ReportError> {
    let columns = dataset.columns();

    let mut writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::from(UTF8_BOM));

    writer.write_record(columns.iter().map(|key| column_label(key))).map_err(|e| ReportError::export("CSV", e))?;

    for row in &dataset.rows {
        writer.write_record(columns.iter().map(|key| row.get(key))).map_err(|e| ReportError::export("CSV", e))?;
    }

    let mut bytes = writer.into_inner().map_err(|e| ReportError::export("CSV", e.error()))?;

    bytes.extend_from_slice(b"\r\n");
    let footer = format!("Relatório gerado em: {}", locale::format_datetime(&dataset.generated_at));
    bytes.extend_from_slice(format!("\"{}\"", footer.replace('"', "\"\"")).as_bytes());

    Ok(bytes)
}
