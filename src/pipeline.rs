use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::aggregate::{merge_summaries, normalize_courses, summarize_table};
use crate::error::{Result, ToolError};
use crate::io::{discover, excel_read, excel_write};
use crate::model::{AggregatedTable, FileSummary};
use crate::report::{build_report, resolve_destination};

/// Reads every workbook and reduces it to a per-course summary. Unreadable
/// workbooks are skipped.
#[instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn summarize_workbooks(paths: &[PathBuf]) -> Vec<FileSummary> {
    paths
        .iter()
        .filter_map(|path| {
            let table = excel_read::read_table(path)?;
            let summary = summarize_table(table, path);
            debug!(
                source = %summary.source,
                courses = summary.totals.len(),
                "file summarized"
            );
            Some(summary)
        })
        .collect()
}

/// Aggregates the given workbooks into the course summary table.
///
/// Fails with [`ToolError::EmptyBatch`] when no workbook could be read.
#[instrument(level = "info", skip_all, fields(files = paths.len()))]
pub fn aggregate_workbooks(paths: &[PathBuf]) -> Result<AggregatedTable> {
    let summaries = summarize_workbooks(paths);
    let skipped = paths.len() - summaries.len();
    if skipped > 0 {
        warn!(skipped, "some workbooks could not be read");
    }

    let merged = merge_summaries(&summaries)?;
    let table = normalize_courses(merged);
    info!(
        files = summaries.len(),
        courses = table.rows.len(),
        "workbooks aggregated"
    );
    Ok(table)
}

/// Saves the three-sheet report for `table` and returns the file written.
///
/// The destination directory is created when missing. Any failure is
/// reported as [`ToolError::WriteFailure`].
#[instrument(level = "info", skip(table))]
pub fn write_report(table: &AggregatedTable, destination: Option<&Path>) -> Result<PathBuf> {
    let output = resolve_destination(destination);
    save(table, &output).map_err(|error| ToolError::WriteFailure {
        path: output.clone(),
        message: error.to_string(),
    })?;
    info!(output = %output.display(), "report saved");
    Ok(output)
}

fn save(table: &AggregatedTable, output: &Path) -> Result<()> {
    if let Some(directory) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(directory)?;
    }
    let report = build_report(table);
    debug!(sheet_count = report.sheets.len(), "report constructed");
    excel_write::write_workbook(output, &report)
}

/// Scans `folder` for workbooks, aggregates them and saves the report.
#[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
pub fn aggregate_folder(folder: &Path, destination: Option<&Path>) -> Result<PathBuf> {
    let paths = discover::find_workbooks(folder)?;
    let table = aggregate_workbooks(&paths)?;
    write_report(&table, destination)
}
