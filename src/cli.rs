use crate::types::ReportType;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Page sizes offered by the on-screen preview.
pub const PAGE_SIZES: [usize; 3] = [10, 25, 50];

/// Which artifacts to produce.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatChoice {
    Csv,
    Pdf,
    Json,
    /// CSV and PDF
    All,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "diabreport")]
#[command(about = "Export registered users, medications, foods or complications as CSV and PDF reports")]
#[command(version)]
pub struct CliArgs {
    /// Report to generate
    #[arg(long = "type", short = 't', value_enum, value_name = "TYPE")]
    pub report_type: Option<ReportType>,

    /// First day of the creation-date window (YYYY-MM-DD)
    #[arg(long, short = 's', value_name = "DATE")]
    pub start: Option<String>,

    /// Last day of the creation-date window, inclusive (YYYY-MM-DD)
    #[arg(long, short = 'e', value_name = "DATE")]
    pub end: Option<String>,

    /// JSON snapshot of the document store
    /// Default: $DIABREPORT_DATA, then ./dados.json
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Output format(s)
    #[arg(long, short = 'f', value_enum, default_value = "all")]
    pub format: FormatChoice,

    /// Directory that receives the report files (created if missing)
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// UTC offset used for displayed dates, e.g. "-03:00" (default: local offset)
    #[arg(long, value_name = "±HH:MM", allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Print one page of the report as a table before exporting
    #[arg(long)]
    pub preview: bool,

    /// Rows per preview page (10, 25 or 50)
    #[arg(long, default_value = "25")]
    pub page_size: usize,

    /// Preview page to show, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // An empty date field counts as not filled in
        args.start = args.start.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        args.end = args.end.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        args
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("--page deve ser maior ou igual a 1".to_string());
        }

        if !PAGE_SIZES.contains(&self.page_size) {
            return Err(format!("--page-size deve ser 10, 25 ou 50 (recebido {})", self.page_size));
        }

        if self.console_width == Some(0) {
            return Err("--console-width deve ser maior que zero".to_string());
        }

        Ok(())
    }
}
