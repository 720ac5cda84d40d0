use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrowforgeError {
    #[error("data directory not found under '{0}'")]
    DataDirNotFound(PathBuf),

    #[error("growth workbook '{0}' not found")]
    WorkbookNotFound(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(PathBuf, #[source] std::io::Error),

    #[error("'{0}' is neither valid UTF-8 nor EUC-KR text")]
    UndecodableText(PathBuf),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(PathBuf, #[source] csv::Error),

    #[error("Failed to read workbook '{0}': {1}")]
    WorkbookError(PathBuf, #[source] calamine::Error),

    #[error("Failed to write CSV: {0}")]
    CsvWrite(#[source] csv::Error),

    #[error("Failed to write workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
}
