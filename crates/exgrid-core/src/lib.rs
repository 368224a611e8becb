//! exgrid-core - Workbook model, grid mutation operations and storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{
    Operation, OperationDefaults, Recipe, SheetShape, Step, Workbook, Worksheet, describe_shape,
};
pub use error::{ExgridError, Result};

pub use exgrid_engine::engine::{Cell, CellRef, CellStyle, CellValue, MergeRange};
