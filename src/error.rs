use thiserror::Error;

/// Failures while reading or writing spreadsheet files.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Read(#[from] calamine::Error),

    #[error("Failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet contains no worksheets")]
    NoSheets,
}

pub type Result<T> = std::result::Result<T, WorkbookError>;
