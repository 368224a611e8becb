//! Error types for exgrid core.

use exgrid_engine::engine::CellRef;
use thiserror::Error;

/// Errors raised by workbook operations and storage.
#[derive(Error, Debug)]
pub enum ExgridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{dimension} {index} is out of range (extent {extent})")]
    OutOfRange {
        dimension: &'static str,
        index: usize,
        extent: usize,
    },

    #[error("Type mismatch at {cell}: expected {expected}, found {found}")]
    TypeMismatch {
        cell: CellRef,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Column {0} is not in the header row")]
    ColumnNotFound(usize),

    #[error("Sheet already exists: {0}")]
    DuplicateSheet(String),

    #[error("Unsupported structure: {0}")]
    UnsupportedStructure(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Recipe error: {0}")]
    Recipe(#[from] toml::de::Error),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No file path set")]
    NoFilePath,

    #[error("CSV file is empty")]
    EmptyCsv,
}

pub type Result<T> = std::result::Result<T, ExgridError>;
