use super::Worksheet;
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellRef, MergeRange};

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug)]
pub(crate) enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Get the coordinate value from a CellRef for this dimension
    pub(crate) fn get_coord(&self, cell_ref: &CellRef) -> usize {
        match self {
            Dimension::Row => cell_ref.row,
            Dimension::Column => cell_ref.col,
        }
    }

    /// Create a new CellRef with modified coordinate in this dimension
    fn new_cell_ref(&self, cell_ref: &CellRef, new_coord: usize) -> CellRef {
        match self {
            Dimension::Row => CellRef::new(new_coord, cell_ref.col),
            Dimension::Column => CellRef::new(cell_ref.row, new_coord),
        }
    }

    /// Inclusive span of a merge range along this dimension
    fn span(&self, range: &MergeRange) -> (usize, usize) {
        match self {
            Dimension::Row => (range.row_start, range.row_end),
            Dimension::Column => (range.col_start, range.col_end),
        }
    }

    /// Copy of a merge range with a new span along this dimension
    fn with_span(&self, range: &MergeRange, start: usize, end: usize) -> MergeRange {
        match self {
            Dimension::Row => MergeRange {
                row_start: start,
                row_end: end,
                ..*range
            },
            Dimension::Column => MergeRange {
                col_start: start,
                col_end: end,
                ..*range
            },
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Dimension::Row => "row",
            Dimension::Column => "column",
        }
    }
}

impl Worksheet {
    pub(crate) fn extent(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Row => self.height(),
            Dimension::Column => self.width(),
        }
    }

    fn out_of_range(&self, dim: Dimension, index: usize) -> ExgridError {
        ExgridError::OutOfRange {
            dimension: dim.label(),
            index,
            extent: self.extent(dim),
        }
    }

    /// Generic delete operation for an inclusive row or column span
    fn delete_dimension(&mut self, dim: Dimension, start: usize, end: usize) -> Result<()> {
        let extent = self.extent(dim);
        if start == 0 || start > extent {
            return Err(self.out_of_range(dim, start));
        }
        if end < start || end > extent {
            return Err(self.out_of_range(dim, end));
        }
        let count = end - start + 1;

        // Collect every cell at or beyond the deleted span
        let cells_to_move: Vec<(CellRef, Cell)> = self
            .grid
            .iter()
            .filter(|entry| dim.get_coord(entry.key()) >= start)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        // Remove them from grid
        for (cell_ref, _) in &cells_to_move {
            self.grid.remove(cell_ref);
        }

        // Reinsert cells past the span with coord - count; cells inside it are dropped
        for (cell_ref, cell) in cells_to_move {
            let coord = dim.get_coord(&cell_ref);
            if coord > end {
                self.grid
                    .insert(dim.new_cell_ref(&cell_ref, coord - count), cell);
            }
        }

        let merges = std::mem::take(&mut self.merges);
        for range in merges {
            let (a, b) = dim.span(&range);
            let shifted = if b < start {
                range
            } else if a > end {
                dim.with_span(&range, a - count, b - count)
            } else if a >= start && b <= end {
                tracing::debug!(sheet = %self.name, merge = %range, "merge discarded with deleted {}", dim.label());
                continue;
            } else {
                // Partial overlap: keep the surviving part of the range
                let new_start = a.min(start);
                let new_end = if b > end { b - count } else { start - 1 };
                let truncated = dim.with_span(&range, new_start, new_end);
                tracing::debug!(sheet = %self.name, from = %range, to = %truncated, "merge truncated");
                truncated
            };
            self.reanchor(shifted);
        }

        tracing::debug!(sheet = %self.name, start, end, "deleted {}s", dim.label());
        Ok(())
    }

    /// Keep a merge range after an edit, promoting its anchor cell out of placeholder state.
    /// Ranges that shrank to a single cell are dissolved.
    fn reanchor(&mut self, range: MergeRange) {
        if let Some(mut anchor) = self.grid.get_mut(&range.anchor()) {
            anchor.placeholder = false;
        }
        if !range.is_single_cell() {
            self.merges.push(range);
        }
    }

    /// Generic insert operation for row or column
    fn insert_dimension(&mut self, dim: Dimension, at: usize) -> Result<()> {
        if at == 0 || at > self.extent(dim) + 1 {
            return Err(self.out_of_range(dim, at));
        }

        // Collect all cells at coord >= at
        let cells_to_move: Vec<(CellRef, Cell)> = self
            .grid
            .iter()
            .filter(|entry| dim.get_coord(entry.key()) >= at)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        // Remove them from grid
        for (cell_ref, _) in &cells_to_move {
            self.grid.remove(cell_ref);
        }

        // Reinsert moved cells with coord + 1
        for (cell_ref, cell) in cells_to_move {
            let coord = dim.get_coord(&cell_ref);
            self.grid.insert(dim.new_cell_ref(&cell_ref, coord + 1), cell);
        }

        for range in &mut self.merges {
            let (a, b) = dim.span(range);
            if a >= at {
                *range = dim.with_span(range, a + 1, b + 1);
            } else if b >= at {
                // Insertion inside a range widens it; the new cells join as placeholders
                *range = dim.with_span(range, a, b + 1);
                let grown = *range;
                for cell_ref in grown.cells().filter(|c| dim.get_coord(c) == at) {
                    self.grid.insert(cell_ref, Cell::new_placeholder());
                }
            }
        }

        tracing::debug!(sheet = %self.name, at, "inserted {}", dim.label());
        Ok(())
    }

    /// Generic move operation: insert at `to`, copy, then delete the original
    fn move_dimension(&mut self, dim: Dimension, from: usize, to: usize) -> Result<()> {
        let extent = self.extent(dim);
        if from == 0 || from > extent {
            return Err(self.out_of_range(dim, from));
        }
        if to == 0 || to > extent + 1 {
            return Err(self.out_of_range(dim, to));
        }
        if let Some(range) = self.merges.iter().find(|range| {
            let (a, b) = dim.span(range);
            a < to && to <= b
        }) {
            return Err(ExgridError::UnsupportedStructure(format!(
                "cannot move a {} into merge {}",
                dim.label(),
                range
            )));
        }

        // Capture the full vector of cells at `from`
        let positions: Vec<CellRef> = match dim {
            Dimension::Row => self
                .header_columns()
                .map(|col| CellRef::new(from, col))
                .collect(),
            Dimension::Column => (1..=self.height()).map(|row| CellRef::new(row, from)).collect(),
        };
        let captured: Vec<(CellRef, Cell)> = positions
            .iter()
            .filter_map(|cell_ref| {
                self.grid.get(cell_ref).map(|cell| {
                    let moved = Cell {
                        placeholder: false,
                        ..cell.clone()
                    };
                    (dim.new_cell_ref(cell_ref, to), moved)
                })
            })
            .collect();

        self.insert_dimension(dim, to)?;
        for (cell_ref, cell) in captured {
            self.grid.insert(cell_ref, cell);
        }

        // Insertion shifted the original past `to` when it came from below/right
        let delete_at = if from > to { from + 1 } else { from };
        self.delete_dimension(dim, delete_at, delete_at)?;

        tracing::debug!(sheet = %self.name, from, to, "moved {}", dim.label());
        Ok(())
    }

    /// Delete rows `start..=end`, shifting everything below up.
    pub fn delete_rows(&mut self, start: usize, end: usize) -> Result<()> {
        self.delete_dimension(Dimension::Row, start, end)
    }

    /// Delete columns `start..=end`, shifting everything to the right left.
    pub fn delete_columns(&mut self, start: usize, end: usize) -> Result<()> {
        self.delete_dimension(Dimension::Column, start, end)
    }

    /// Insert an empty row at `at`, pushing row `at` and below down by one.
    pub fn insert_row_at(&mut self, at: usize) -> Result<()> {
        self.insert_dimension(Dimension::Row, at)
    }

    /// Insert an empty column at `at`, pushing column `at` and beyond right by one.
    pub fn insert_column_at(&mut self, at: usize) -> Result<()> {
        self.insert_dimension(Dimension::Column, at)
    }

    /// Move row `from` so that it lands at index `to` of the grid it is inserted into.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        self.move_dimension(Dimension::Row, from, to)
    }

    /// Move column `from` so that it lands at index `to` of the grid it is inserted into.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        self.move_dimension(Dimension::Column, from, to)
    }
}
