//! PDF export functionality
//!
//! Landscape A4 report built with printpdf. Every page carries the colored
//! header band with the report title, the metadata strip (period, total,
//! generation time), the table head, and a footer with the page number.
//!
//! Rendering runs in two passes: `paginate` measures and places every row,
//! then the placed pages are drawn.

mod layout;
mod metrics;

use layout::{Align, PdfLayout, TableColumn, layout_for};
use metrics::{text_width_mm, wrap_text};

use crate::error::ReportError;
use crate::labels::SYSTEM_CAPTION;
use crate::locale;
use crate::types::{Dataset, Row};
use log::debug;
use metrics::pt_to_mm;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rect,
    Rgb,
};
use std::io::BufWriter;

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_X_MM: f32 = 2.0;
const BAND_HEIGHT_MM: f32 = 15.0;
const TABLE_TOP_MM: f32 = 36.0;
const TABLE_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - 20.0;
const FOOTER_RULE_MM: f32 = PAGE_HEIGHT_MM - 15.0;
const FOOTER_TEXT_MM: f32 = PAGE_HEIGHT_MM - 8.0;

const LINE_SPACING: f32 = 1.15;
/// Distance from the top of a text line to its baseline, in font sizes.
const ASCENT: f32 = 0.8;
/// 0.1 mm.
const BORDER_WIDTH_PT: f32 = 0.28;

type Rgb8 = (u8, u8, u8);

const ACCENT: Rgb8 = (59, 130, 246);
const WHITE: Rgb8 = (255, 255, 255);
const BLACK: Rgb8 = (0, 0, 0);
const STRIPE: Rgb8 = (248, 250, 252);
const RULE: Rgb8 = (200, 200, 200);
const FOOTER_GRAY: Rgb8 = (100, 100, 100);

/// Render `dataset` with the layout for its report type.
pub fn to_pdf(dataset: &Dataset) -> Result<Vec<u8>, ReportError> {
    let layout = layout_for(dataset);
    render(dataset, layout.as_ref())
}

/// Cell texts wrapped to their column, plus the resulting row height.
#[derive(Debug, Clone)]
struct MeasuredRow {
    lines: Vec<Vec<String>>,
    height: f32,
}

fn line_height(size_pt: f32) -> f32 {
    pt_to_mm(size_pt) * LINE_SPACING
}

fn measure(texts: &[String], columns: &[TableColumn], size_pt: f32, padding: f32, bold: bool) -> MeasuredRow {
    let lines: Vec<Vec<String>> = texts
        .iter()
        .zip(columns)
        .map(|(text, column)| wrap_text(text, (column.width_mm - 2.0 * padding).max(1.0), size_pt, bold))
        .collect();
    let count = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    MeasuredRow { lines, height: count as f32 * line_height(size_pt) + 2.0 * padding }
}

#[derive(Debug, Clone)]
struct PlacedRow {
    index: usize,
    top: f32,
    cells: MeasuredRow,
}

/// Body rows of one page. The head row always sits at `TABLE_TOP_MM`.
#[derive(Debug, Clone, Default)]
struct TablePage {
    rows: Vec<PlacedRow>,
}

#[derive(Debug, Clone)]
struct TablePlan {
    head: MeasuredRow,
    pages: Vec<TablePage>,
}

/// Place every row, starting a new page when the next row would cross the
/// bottom margin. A page always receives at least one row, so an oversized
/// row overflows instead of looping. Returns at least one page.
fn paginate(layout: &dyn PdfLayout, rows: &[Row]) -> TablePlan {
    let style = layout.style();
    let columns = layout.columns();
    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    let head = measure(&headers, columns, style.head_font_size, style.head_padding, true);
    let body_top = TABLE_TOP_MM + head.height;

    let mut pages = vec![TablePage::default()];
    let mut y = body_top;

    for (index, row) in rows.iter().enumerate() {
        let texts: Vec<String> = columns.iter().map(|c| layout.cell_text(row, c)).collect();
        let cells = measure(&texts, columns, style.font_size, style.cell_padding, false);

        let page_has_rows = pages.last().is_some_and(|p| !p.rows.is_empty());
        if page_has_rows && y + cells.height > TABLE_BOTTOM_MM {
            pages.push(TablePage::default());
            y = body_top;
        }

        let height = cells.height;
        if let Some(page) = pages.last_mut() {
            page.rows.push(PlacedRow { index, top: y, cells });
        }
        y += height;
    }

    TablePlan { head, pages }
}

/// Text repeated on every page.
struct PageFrame {
    title: String,
    period: String,
    total: String,
    generated: String,
}

impl PageFrame {
    fn new(dataset: &Dataset, title: &str) -> Self {
        PageFrame {
            title: title.to_uppercase(),
            period: format!(
                "{} até {}",
                locale::format_date(dataset.window.start),
                locale::format_date(dataset.window.end)
            ),
            total: dataset.len().to_string(),
            generated: locale::format_datetime(&dataset.generated_at),
        }
    }

    fn draw(&self, canvas: &Canvas, page_number: usize) {
        canvas.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, BAND_HEIGHT_MM, ACCENT);
        canvas.text(&self.title, 14.0, MARGIN_X_MM, 10.0, true, WHITE);
        canvas.text(&SYSTEM_CAPTION.to_uppercase(), 9.0, 200.0, 10.0, false, WHITE);

        canvas.text("PERÍODO:", 9.0, MARGIN_X_MM, 22.0, true, BLACK);
        canvas.text(&self.period, 9.0, 20.0, 22.0, false, BLACK);
        canvas.text("TOTAL:", 9.0, MARGIN_X_MM, 28.0, true, BLACK);
        canvas.text(&self.total, 9.0, 17.0, 28.0, false, BLACK);
        canvas.text("GERADO:", 9.0, 70.0, 28.0, true, BLACK);
        canvas.text(&self.generated, 9.0, 85.0, 28.0, false, BLACK);
        canvas.hline(MARGIN_X_MM, PAGE_WIDTH_MM - MARGIN_X_MM, 32.0, RULE);

        canvas.hline(MARGIN_X_MM, PAGE_WIDTH_MM - MARGIN_X_MM, FOOTER_RULE_MM, RULE);
        canvas.text(&format!("Página {}", page_number), 7.0, MARGIN_X_MM, FOOTER_TEXT_MM, false, FOOTER_GRAY);
        let caption_x = (PAGE_WIDTH_MM - text_width_mm(SYSTEM_CAPTION, 7.0, false)) / 2.0;
        canvas.text(SYSTEM_CAPTION, 7.0, caption_x, FOOTER_TEXT_MM, false, FOOTER_GRAY);
        canvas.text(
            &format!("Gerado em: {}", self.generated),
            7.0,
            PAGE_WIDTH_MM - 60.0,
            FOOTER_TEXT_MM,
            false,
            FOOTER_GRAY,
        );
    }
}

fn color((r, g, b): Rgb8) -> Color {
    Color::Rgb(Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None))
}

/// One page layer, addressed in millimetres from the top-left corner.
struct Canvas {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Canvas {
    fn flip(top: f32) -> Mm {
        Mm(PAGE_HEIGHT_MM - top)
    }

    fn text(&self, text: &str, size_pt: f32, x: f32, baseline: f32, bold: bool, fill: Rgb8) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(fill));
        self.layer.use_text(text, size_pt, Mm(x), Self::flip(baseline), font);
    }

    fn rect(&self, x: f32, top: f32, width: f32, height: f32, mode: PaintMode) {
        let rect = Rect::new(Mm(x), Self::flip(top + height), Mm(x + width), Self::flip(top)).with_mode(mode);
        self.layer.add_rect(rect);
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, fill: Rgb8) {
        self.layer.set_fill_color(color(fill));
        self.rect(x, top, width, height, PaintMode::Fill);
    }

    fn stroke_rect(&self, x: f32, top: f32, width: f32, height: f32, stroke: Rgb8) {
        self.layer.set_outline_color(color(stroke));
        self.layer.set_outline_thickness(BORDER_WIDTH_PT);
        self.rect(x, top, width, height, PaintMode::Stroke);
    }

    fn hline(&self, x1: f32, x2: f32, top: f32, stroke: Rgb8) {
        self.layer.set_outline_color(color(stroke));
        self.layer.set_outline_thickness(BORDER_WIDTH_PT);
        self.layer.add_line(Line {
            points: vec![(Point::new(Mm(x1), Self::flip(top)), false), (Point::new(Mm(x2), Self::flip(top)), false)],
            is_closed: false,
        });
    }
}

struct RowPaint {
    size_pt: f32,
    padding: f32,
    bold: bool,
    text_color: Rgb8,
    fill: Option<Rgb8>,
    align: Align,
}

fn draw_row(canvas: &Canvas, columns: &[TableColumn], cells: &MeasuredRow, top: f32, paint: &RowPaint) {
    let ascent = pt_to_mm(paint.size_pt) * ASCENT;
    let mut x = MARGIN_X_MM;

    for (column, lines) in columns.iter().zip(&cells.lines) {
        if let Some(fill) = paint.fill {
            canvas.fill_rect(x, top, column.width_mm, cells.height, fill);
        }
        canvas.stroke_rect(x, top, column.width_mm, cells.height, RULE);

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let text_x = match paint.align {
                Align::Left => x + paint.padding,
                Align::Center => x + (column.width_mm - text_width_mm(line, paint.size_pt, paint.bold)) / 2.0,
            };
            let baseline = top + paint.padding + i as f32 * line_height(paint.size_pt) + ascent;
            canvas.text(line, paint.size_pt, text_x, baseline, paint.bold, paint.text_color);
        }
        x += column.width_mm;
    }
}

/// Render `dataset` with an explicit layout.
pub fn render(dataset: &Dataset, layout: &dyn PdfLayout) -> Result<Vec<u8>, ReportError> {
    let plan = paginate(layout, &dataset.rows);
    let style = layout.style();
    let columns = layout.columns();
    let frame = PageFrame::new(dataset, layout.title());

    let (doc, first_page, first_layer) =
        PdfDocument::new(layout.title(), Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Página 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| ReportError::export("PDF", e))?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| ReportError::export("PDF", e))?;
    let mut canvas = Canvas { layer: doc.get_page(first_page).get_layer(first_layer), regular, bold };

    let head_paint = RowPaint {
        size_pt: style.head_font_size,
        padding: style.head_padding,
        bold: true,
        text_color: WHITE,
        fill: Some(ACCENT),
        align: style.head_align,
    };

    for (page_index, page) in plan.pages.iter().enumerate() {
        let page_number = page_index + 1;
        if page_index > 0 {
            let (page_ref, layer_ref) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Página {}", page_number));
            canvas.layer = doc.get_page(page_ref).get_layer(layer_ref);
        }

        frame.draw(&canvas, page_number);
        draw_row(&canvas, columns, &plan.head, TABLE_TOP_MM, &head_paint);

        for placed in &page.rows {
            let paint = RowPaint {
                size_pt: style.font_size,
                padding: style.cell_padding,
                bold: false,
                text_color: BLACK,
                fill: if placed.index % 2 == 1 { Some(STRIPE) } else { None },
                align: Align::Left,
            };
            draw_row(&canvas, columns, &placed.cells, placed.top, &paint);
        }
    }

    debug!(
        "Rendered {} rows of {} on {} PDF page(s), table {:.1} mm wide",
        dataset.len(),
        dataset.report_type,
        plan.pages.len(),
        layout.table_width()
    );
    save(doc)
}

fn save(doc: PdfDocumentReference) -> Result<Vec<u8>, ReportError> {
    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer).map_err(|e| ReportError::export("PDF", e))?;
    buffer.into_inner().map_err(|e| ReportError::export("PDF", e.error()))
}

#[cfg(test)]
mod tests {
    use super::layout::{DenseUsersLayout, GenericLayout};
    use super::*;
    use crate::types::{ReportType, ReportWindow};
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    fn dataset(report_type: ReportType, rows: Vec<Row>) -> Dataset {
        Dataset {
            report_type,
            window: ReportWindow::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            ),
            generated_at: FixedOffset::west_opt(3 * 3600).unwrap().with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap(),
            rows,
        }
    }

    fn food(id: usize, name: &str) -> Row {
        let cells = ReportType::Foods
            .columns()
            .iter()
            .map(|key| match *key {
                "nome" => (*key, name.to_string()),
                "dataCadastro" => (*key, "15/01/2024".to_string()),
                _ => (*key, String::new()),
            })
            .collect();
        Row { id: format!("f{}", id), cells }
    }

    #[test]
    fn test_empty_dataset_renders_single_page() {
        let data = dataset(ReportType::Foods, vec![]);
        let layout = layout_for(&data);
        let plan = paginate(layout.as_ref(), &data.rows);
        assert_eq!(plan.pages.len(), 1);
        assert!(plan.pages[0].rows.is_empty());

        let bytes = to_pdf(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_rows_flow_onto_new_pages_within_margins() {
        let rows: Vec<Row> = (0..120).map(|i| food(i, "Arroz integral cozido")).collect();
        let layout = GenericLayout::new(ReportType::Foods);
        let plan = paginate(&layout, &rows);

        assert!(plan.pages.len() > 1);
        let placed: usize = plan.pages.iter().map(|p| p.rows.len()).sum();
        assert_eq!(placed, 120);

        for page in &plan.pages {
            let first = &page.rows[0];
            assert!((first.top - (TABLE_TOP_MM + plan.head.height)).abs() < 0.001);
            for row in &page.rows {
                assert!(row.top + row.cells.height <= TABLE_BOTTOM_MM + 0.001);
            }
        }

        let indices: Vec<usize> = plan.pages.iter().flat_map(|p| p.rows.iter().map(|r| r.index)).collect();
        assert_eq!(indices, (0..120).collect::<Vec<_>>());
    }

    #[test]
    fn test_long_text_grows_row_height() {
        let layout = GenericLayout::new(ReportType::Foods);
        let short = paginate(&layout, &[food(0, "Arroz")]);
        let long = paginate(&layout, &[food(0, &"Feijão preto cozido com legumes ".repeat(4))]);
        assert!(long.pages[0].rows[0].cells.height > short.pages[0].rows[0].cells.height);
    }

    #[test]
    fn test_dense_head_wraps_prebroken_headers() {
        let layout = DenseUsersLayout::new();
        let plan = paginate(&layout, &[]);
        let style = layout.style();
        let single_line = line_height(style.head_font_size) + 2.0 * style.head_padding;
        assert!(plan.head.height > single_line);
        let possui = layout.columns().iter().position(|c| c.key == "possuiComplicacoes").unwrap();
        assert!(plan.head.lines[possui].len() > 1);
    }

    #[test]
    fn test_users_report_renders() {
        let cells = ReportType::Users.columns().iter().map(|key| (*key, "Valor".to_string())).collect();
        let data = dataset(ReportType::Users, vec![Row { id: "u1".to_string(), cells }]);
        let bytes = to_pdf(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_frame_text() {
        let data = dataset(ReportType::Medications, vec![food(0, "x")]);
        let frame = PageFrame::new(&data, "Medicações cadastradas");
        assert_eq!(frame.title, "MEDICAÇÕES CADASTRADAS");
        assert_eq!(frame.period, "01/01/2024 até 31/01/2024");
        assert_eq!(frame.total, "1");
        assert_eq!(frame.generated, "01/02/2024, 10:00:00");
    }
}
