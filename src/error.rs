use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failure cases of a tally run, from locating the
/// input workbooks to saving the summary report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook contains no worksheet at all.
    #[error("workbook has no worksheet: {0}")]
    EmptyWorkbook(PathBuf),

    /// Raised when the folder to scan does not exist.
    #[error("data folder not found: {0}")]
    MissingFolder(PathBuf),

    /// Raised when the folder holds no `.xlsx` workbook.
    #[error("no valid .xlsx files found in {0}")]
    MissingInput(PathBuf),

    /// Raised when none of the selected workbooks could be read.
    #[error("none of the selected workbooks could be read")]
    EmptyBatch,

    /// Raised when the summary report cannot be created or saved.
    #[error("error saving file {path}: {message}")]
    WriteFailure { path: PathBuf, message: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
