//! Table layouts for the PDF renderer.
//!
//! A layout decides the title, the columns (header text and width), the cell
//! style, and how each row value is turned into cell text. The users report
//! gets a dense fixed layout; every other report type uses the generic one
//! driven by the column width allocator.

use crate::labels::{self, abbreviate_diabetes, abbreviate_gender, column_label};
use crate::report::{PDF_TABLE_WIDTH_MM, allocate};
use crate::types::{Dataset, ReportType, Row};

/// Characters that fit in one millimetre of column at the generic body size.
pub const CHARS_PER_MM: f32 = 2.5;

/// Placeholder drawn for an empty cell.
pub const MISSING_CELL: &str = "-";

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub cell_padding: f32,
    pub head_font_size: f32,
    pub head_padding: f32,
    pub head_align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub key: &'static str,
    pub header: String,
    pub width_mm: f32,
}

/// How a report type is laid out as a PDF table.
pub trait PdfLayout {
    fn title(&self) -> &'static str;

    fn columns(&self) -> &[TableColumn];

    fn style(&self) -> TableStyle;

    /// Text drawn in the cell of `column` for `row`.
    fn cell_text(&self, row: &Row, column: &TableColumn) -> String;

    fn table_width(&self) -> f32 {
        self.columns().iter().map(|c| c.width_mm).sum()
    }
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(ELLIPSIS.len())).collect();
    format!("{}{}", kept, ELLIPSIS)
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() { MISSING_CELL } else { value }
}

/// Layout for any report type: widths from the allocator, text cut to fit.
#[derive(Debug, Clone)]
pub struct GenericLayout {
    report_type: ReportType,
    columns: Vec<TableColumn>,
}

impl GenericLayout {
    pub fn new(report_type: ReportType) -> Self {
        let keys = report_type.columns();
        let plan = allocate(report_type, keys, PDF_TABLE_WIDTH_MM);
        let columns = keys
            .iter()
            .map(|&key| TableColumn {
                key,
                header: column_label(key).to_string(),
                width_mm: plan.width(key).unwrap_or(0) as f32,
            })
            .collect();
        GenericLayout { report_type, columns }
    }

    /// Longest text a column of this width shows before truncation.
    pub fn max_chars(width_mm: f32) -> usize {
        (width_mm * CHARS_PER_MM).floor() as usize
    }
}

impl PdfLayout for GenericLayout {
    fn title(&self) -> &'static str {
        labels::report_type_label(self.report_type)
    }

    fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    fn style(&self) -> TableStyle {
        TableStyle { font_size: 8.0, cell_padding: 2.5, head_font_size: 9.0, head_padding: 3.0, head_align: Align::Left }
    }

    fn cell_text(&self, row: &Row, column: &TableColumn) -> String {
        truncate_text(or_missing(row.get(column.key)), Self::max_chars(column.width_mm))
    }
}

struct DenseColumn {
    key: &'static str,
    header: &'static str,
    width_mm: f32,
    max_chars: Option<usize>,
}

// Headers are pre-broken so they wrap into narrow columns.
const DENSE_USER_COLUMNS: [DenseColumn; 15] = [
    DenseColumn { key: "nome", header: "Nome", width_mm: 28.0, max_chars: Some(25) },
    DenseColumn { key: "email", header: "E-mail", width_mm: 35.0, max_chars: Some(30) },
    DenseColumn { key: "genero", header: "Gên", width_mm: 12.0, max_chars: None },
    DenseColumn { key: "diabetes", header: "Tipo Diab", width_mm: 16.0, max_chars: None },
    DenseColumn { key: "duracao", header: "Dura ção", width_mm: 16.0, max_chars: None },
    DenseColumn { key: "peso", header: "Pe so (kg)", width_mm: 14.0, max_chars: None },
    DenseColumn { key: "altura", header: "Alt (c m)", width_mm: 14.0, max_chars: None },
    DenseColumn { key: "imc", header: "I M C", width_mm: 12.0, max_chars: None },
    DenseColumn { key: "acompanhamento", header: "Acomp anham ento", width_mm: 18.0, max_chars: None },
    DenseColumn { key: "hipertenso", header: "Hipe rten so", width_mm: 16.0, max_chars: None },
    DenseColumn { key: "possuiComplicacoes", header: "Possui Compli cações", width_mm: 18.0, max_chars: None },
    DenseColumn {
        key: "descricaoComplicacoes",
        header: "Descrição das Complicações",
        width_mm: 35.0,
        max_chars: Some(35),
    },
    DenseColumn { key: "medicamentos", header: "Medicamentos", width_mm: 35.0, max_chars: Some(35) },
    DenseColumn { key: "status", header: "Sta tus", width_mm: 14.0, max_chars: None },
    DenseColumn { key: "dataCadastro", header: "Data C adastr o", width_mm: 20.0, max_chars: None },
];

/// Fixed fifteen-column layout for the users report.
///
/// The hand-tuned widths add up to 303 mm, more than the 293 mm printable
/// table width. As a page-fit adjustment they are scaled down uniformly, which
/// keeps their proportions; the headers and truncation lengths are unchanged.
#[derive(Debug, Clone)]
pub struct DenseUsersLayout {
    columns: Vec<TableColumn>,
}

impl DenseUsersLayout {
    pub fn new() -> Self {
        let budget = PDF_TABLE_WIDTH_MM as f32;
        let total: f32 = DENSE_USER_COLUMNS.iter().map(|c| c.width_mm).sum();
        let scale = if total > budget { budget / total } else { 1.0 };
        let columns = DENSE_USER_COLUMNS
            .iter()
            .map(|c| TableColumn { key: c.key, header: c.header.to_string(), width_mm: c.width_mm * scale })
            .collect();
        DenseUsersLayout { columns }
    }

    fn max_chars(key: &str) -> Option<usize> {
        DENSE_USER_COLUMNS.iter().find(|c| c.key == key).and_then(|c| c.max_chars)
    }
}

impl Default for DenseUsersLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfLayout for DenseUsersLayout {
    fn title(&self) -> &'static str {
        labels::report_type_label(ReportType::Users)
    }

    fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    fn style(&self) -> TableStyle {
        TableStyle { font_size: 7.0, cell_padding: 1.5, head_font_size: 7.0, head_padding: 2.0, head_align: Align::Center }
    }

    fn cell_text(&self, row: &Row, column: &TableColumn) -> String {
        let value = row.get(column.key);
        let text = match column.key {
            "genero" => or_missing(abbreviate_gender(value)).to_string(),
            "diabetes" => or_missing(abbreviate_diabetes(value)).to_string(),
            "acompanhamento" | "hipertenso" | "possuiComplicacoes" => labels::yes_no(value == "Sim").to_string(),
            "status" => (if value == "Ativo" { "Ativo" } else { "Inativo" }).to_string(),
            _ => or_missing(value).to_string(),
        };
        match Self::max_chars(column.key) {
            Some(max) => truncate_text(&text, max),
            None => text,
        }
    }
}

/// Pick the layout for a dataset's report type.
pub fn layout_for(dataset: &Dataset) -> Box<dyn PdfLayout> {
    match dataset.report_type {
        ReportType::Users => Box::new(DenseUsersLayout::new()),
        ReportType::Medications | ReportType::Foods | ReportType::Complications => {
            Box::new(GenericLayout::new(dataset.report_type))
        }
    }
}
