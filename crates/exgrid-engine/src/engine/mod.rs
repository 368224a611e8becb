//! Grid primitives.
//!
//! This module provides the data types every worksheet operation is built on:
//!
//! - [`Cell`], [`CellValue`], [`CellStyle`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`], [`column_letter`], [`column_number`] - A1 notation ↔ row/col indices
//! - [`MergeRange`] - Merged rectangles and their A1 range form
//! - [`to_identifier_case`], [`strip_punctuation`], [`strip_parentheticals`] - Header text cleanup

mod cell;
mod cell_ref;
mod merge;
mod text;

pub use cell::{Cell, CellStyle, CellValue, FontStyle, Grid};
pub use cell_ref::{CellRef, column_letter, column_number};
pub use merge::MergeRange;
pub use text::{strip_parentheticals, strip_punctuation, to_identifier_case};
