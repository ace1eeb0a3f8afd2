/// Console formatting module - Pure rendering concerns
///
/// This module handles the on-screen preview of a report:
/// - Column widths sized to the terminal (same allocator as the PDF)
/// - Box-drawn table layout with a colored header row
/// - Text truncation and padding by display width
/// - Page indicator and empty-result message
///
/// The preview shows one page of the dataset; exports are never paginated.

use crate::labels::{column_label, report_type_label};
use crate::locale::format_date;
use crate::report::allocate;
use crate::types::{Dataset, ReportType};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest column the preview draws; room for "...".
pub const MIN_COLUMN_WIDTH: usize = 3;

pub const EMPTY_MESSAGE: &str = "Nenhum registro encontrado para os critérios selecionados.";

const HEADER_COLOR: Color = term::color::BRIGHT_CYAN;

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors
            && let Some(ref mut t) = term::stdout()
        {
            let _ = t.fg(color);
            let _ = t.write_all(text.as_bytes());
            let _ = t.reset();
            return Ok(());
        }
        write!(self.writer, "{}", text)
    }

    fn write_border(&mut self, widths: &[usize], left: char, mid: char, right: char) -> io::Result<()> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        writeln!(self.writer, "{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn write_cells(&mut self, cells: &[String], widths: &[usize], color: Option<Color>) -> io::Result<()> {
        let padded: Vec<String> = cells.iter().zip(widths).map(|(cell, w)| truncate_with_padding(cell, *w)).collect();
        let line = format!("│ {} │", padded.join(" │ "));
        match color {
            Some(color) => self.write_colored(&line, color)?,
            None => write!(self.writer, "{}", line)?,
        }
        writeln!(self.writer)
    }

    /// Write one page of `dataset` as a table no wider than `terminal_width`
    /// (unless every column is already at its minimum).
    pub fn write_preview(
        &mut self,
        dataset: &Dataset,
        page: usize,
        page_size: usize,
        terminal_width: usize,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "{} ({} até {})",
            report_type_label(dataset.report_type),
            format_date(dataset.window.start),
            format_date(dataset.window.end)
        )?;

        if dataset.is_empty() {
            writeln!(self.writer, "{}", EMPTY_MESSAGE)?;
            return Ok(());
        }

        let pages = dataset.page_count(page_size);
        let page = page.clamp(1, pages);
        let keys = dataset.columns();
        let widths = preview_widths(dataset.report_type, terminal_width);

        let headers: Vec<String> = keys.iter().map(|k| column_label(k).to_string()).collect();
        self.write_border(&widths, '┌', '┬', '┐')?;
        self.write_cells(&headers, &widths, Some(HEADER_COLOR))?;
        self.write_border(&widths, '├', '┼', '┤')?;

        for row in dataset.page(page, page_size) {
            let cells: Vec<String> = keys.iter().map(|k| preview_cell(row.get(k))).collect();
            self.write_cells(&cells, &widths, None)?;
        }

        self.write_border(&widths, '└', '┴', '┘')?;
        writeln!(self.writer, "Página {} de {} · Total de registros: {}", page, pages, dataset.len())
    }
}

fn preview_cell(value: &str) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.trim().is_empty() { "-".to_string() } else { flat }
}

/// Content width of each column for a terminal `terminal_width` columns wide.
///
/// Borders take `3n + 1` columns; the rest is distributed by the column width
/// allocator, treating one character as one unit.
pub fn preview_widths(report_type: ReportType, terminal_width: usize) -> Vec<usize> {
    let keys = report_type.columns();
    let chrome = 3 * keys.len() + 1;
    let budget = terminal_width.saturating_sub(chrome).max(keys.len() * MIN_COLUMN_WIDTH);
    allocate(report_type, keys, budget as u32).iter().map(|(_, w)| (w as usize).max(MIN_COLUMN_WIDTH)).collect()
}

/// Render a preview page to a plain string (no colors)
#[cfg(test)]
pub fn format_preview(dataset: &Dataset, page: usize, page_size: usize, terminal_width: usize) -> String {
    let mut writer = TableWriter::new(Vec::new(), false);
    // Writing into a Vec cannot fail
    let _ = writer.write_preview(dataset, page, page_size, terminal_width);
    String::from_utf8_lossy(&writer.writer).into_owned()
}

/// Print a preview page to stdout with colors
pub fn print_preview(dataset: &Dataset, page: usize, page_size: usize) -> io::Result<()> {
    let stdout = io::stdout();
    let mut writer = TableWriter::new(stdout.lock(), true);
    writer.write_preview(dataset, page, page_size, get_terminal_width())
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Pin the console width (testing, or `--console-width`)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Console width override, else terminal width, else 120
pub fn get_terminal_width() -> usize {
    if let Some(width) = CONSOLE_WIDTH.get() {
        return *width;
    }
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

/// Calculate display width of a string (handles Unicode properly)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);

            if current_width + c_width > target_width {
                break;
            }

            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        // Pad if needed
        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        let padding = width - display_w;
        format!("{}{}", s, " ".repeat(padding))
    }
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
