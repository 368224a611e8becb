//! Workbook model and grid operations.

mod fill;
mod io;
mod merge;
mod ops;
mod prune;
mod recipe;
mod shape;
mod sheet;
mod state;

pub use recipe::{Operation, OperationDefaults, Recipe, Step};
pub use shape::{SheetShape, describe_shape};
pub use sheet::Worksheet;
pub use state::Workbook;
