//! Merge range rectangles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::CellRef;

/// A merged rectangle, inclusive on both ends, anchored at its top-left cell.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MergeRange {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl MergeRange {
    /// Build a range, returning None for zero indices or inverted bounds.
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Option<Self> {
        if row_start == 0 || col_start == 0 || row_start > row_end || col_start > col_end {
            return None;
        }
        Some(MergeRange {
            row_start,
            row_end,
            col_start,
            col_end,
        })
    }

    /// Range spanning two corner cells.
    pub fn from_corners(start: CellRef, end: CellRef) -> Option<Self> {
        Self::new(start.row, end.row, start.col, end.col)
    }

    /// Parse A1 range notation ("B2:D2").
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(range: &str) -> Option<Self> {
        let (start, end) = range.trim().split_once(':')?;
        Self::from_corners(CellRef::from_str(start.trim())?, CellRef::from_str(end.trim())?)
    }

    /// The only cell of the range allowed to hold a value.
    pub fn anchor(&self) -> CellRef {
        CellRef::new(self.row_start, self.col_start)
    }

    pub fn end(&self) -> CellRef {
        CellRef::new(self.row_end, self.col_end)
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        (self.row_start..=self.row_end).contains(&cell.row)
            && (self.col_start..=self.col_end).contains(&cell.col)
    }

    pub fn is_single_row(&self) -> bool {
        self.row_start == self.row_end
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_start == self.row_end && self.col_start == self.col_end
    }

    pub fn overlaps(&self, other: &MergeRange) -> bool {
        self.row_start <= other.row_end
            && other.row_start <= self.row_end
            && self.col_start <= other.col_end
            && other.col_start <= self.col_end
    }

    /// Every cell of the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.row_start..=self.row_end)
            .flat_map(move |row| (self.col_start..=self.col_end).map(move |col| CellRef::new(row, col)))
    }
}

impl std::str::FromStr for MergeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MergeRange::from_str(s).ok_or_else(|| format!("Invalid merge range: {}", s))
    }
}

impl fmt::Display for MergeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.anchor(), self.end())
    }
}
