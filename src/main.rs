// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod config;
mod console_format;
mod error;
mod export;
mod labels;
mod locale;
mod report;
mod source;
mod types;
mod ui;

#[cfg(test)]
mod data_structures_test;

use chrono::Utc;
use config::ReportRun;
use error::ReportError;
use log::{debug, error};
use source::{RecordFilter, RecordSource, SnapshotSource};
use std::path::PathBuf;
use types::Dataset;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Resolve and validate the whole run before touching the store
    let run = match config::build_report_run(&args, Utc::now()) {
        Ok(run) => run,
        Err(e) => fail(&e),
    };

    let source = match SnapshotSource::load(&run.data_path) {
        Ok(source) => source,
        Err(e) => fail(&e),
    };

    let dataset = match fetch_dataset(&run, &source) {
        Ok(dataset) => dataset,
        Err(e) => fail(&e),
    };

    ui::status(&format!(
        "{}: {} registro(s) de {} até {}",
        labels::report_type_label(run.report_type),
        dataset.len(),
        locale::format_date(run.window.start),
        locale::format_date(run.window.end)
    ));

    if let Some(preview) = run.preview {
        // Console width override if specified (for testing)
        if let Some(width) = preview.console_width {
            console_format::set_console_width(width);
        }
        if let Err(e) = console_format::print_preview(&dataset, preview.page, preview.page_size) {
            debug!("Preview output failed: {}", e);
        }
    }

    match write_artifacts(&run, &dataset) {
        Ok(written) => {
            for (format, path) in written {
                ui::artifact_written(format.label(), &path);
            }
        }
        Err(e) => fail(&e),
    }
}

/// Log the full detail, show the user-facing message, exit 1
fn fail(e: &ReportError) -> ! {
    error!("{}", e.detail());
    ui::print_error(&e.to_string());
    std::process::exit(1);
}

/// Fetch the run's records and assemble the dataset
fn fetch_dataset(run: &ReportRun, source: &dyn RecordSource) -> Result<Dataset, ReportError> {
    let filter = RecordFilter::for_report(run.report_type, &run.window);
    let records = source.fetch_records(run.report_type.collection(), &filter)?;
    debug!("Fetched {} records for {}", records.len(), run.report_type);
    Ok(report::assemble(run.report_type, &records, run.window, run.generated_at))
}

/// Serialize every requested format, then write them. Nothing is written if
/// any serializer fails.
fn write_artifacts(run: &ReportRun, dataset: &Dataset) -> Result<Vec<(export::ExportFormat, PathBuf)>, ReportError> {
    let artifacts = run
        .formats
        .iter()
        .map(|format| export::export(dataset, *format).map(|artifact| (*format, artifact)))
        .collect::<Result<Vec<_>, _>>()?;

    artifacts
        .into_iter()
        .map(|(format, artifact)| artifact.write_to(&run.output_dir).map(|path| (format, path)))
        .collect()
}
