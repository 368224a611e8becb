use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellRef, CellValue, Grid, MergeRange, column_letter};
use std::ops::RangeInclusive;

/// A named 2-D grid of cells plus its active merge ranges.
///
/// Rows and columns are 1-based. The extent is derived from the stored cells,
/// so every structural edit keeps it consistent by re-keying cells.
#[derive(Clone, Debug, Default)]
pub struct Worksheet {
    pub name: String,
    /// Sparse cell storage
    pub grid: Grid,
    /// Active merge ranges (never overlapping)
    pub merges: Vec<MergeRange>,
}

impl Worksheet {
    pub fn new(name: &str) -> Self {
        Worksheet {
            name: name.to_string(),
            grid: Grid::new(),
            merges: Vec::new(),
        }
    }

    /// Largest row index of any stored cell (0 for an empty sheet).
    pub fn height(&self) -> usize {
        self.grid.iter().map(|entry| entry.key().row).max().unwrap_or(0)
    }

    /// Largest column index of any stored cell (0 for an empty sheet).
    pub fn width(&self) -> usize {
        self.grid.iter().map(|entry| entry.key().col).max().unwrap_or(0)
    }

    /// Columns covered by the header row scan.
    ///
    /// The header row spans the full sheet width, so every column up to the
    /// widest stored cell counts as occupied even when row 1 has no value there.
    pub fn header_columns(&self) -> RangeInclusive<usize> {
        1..=self.width()
    }

    /// Stored value of a cell. Placeholders report None.
    pub fn value(&self, row: usize, col: usize) -> Option<CellValue> {
        self.grid
            .get(&CellRef::new(row, col))
            .and_then(|cell| cell.value.clone())
    }

    /// Value as displayed: placeholders show their anchor's value.
    pub fn display_value(&self, row: usize, col: usize) -> Option<CellValue> {
        let cell_ref = CellRef::new(row, col);
        if self.is_placeholder(row, col)
            && let Some(range) = self.merge_at(&cell_ref)
        {
            let anchor = range.anchor();
            return self.value(anchor.row, anchor.col);
        }
        self.value(row, col)
    }

    pub fn is_placeholder(&self, row: usize, col: usize) -> bool {
        self.grid
            .get(&CellRef::new(row, col))
            .is_some_and(|cell| cell.placeholder)
    }

    /// Write a value into a cell, creating it on first write.
    ///
    /// Writing None into a cell that does not exist is a no-op.
    pub fn set_value(&mut self, row: usize, col: usize, value: Option<CellValue>) -> Result<()> {
        if row == 0 {
            return Err(ExgridError::OutOfRange {
                dimension: "row",
                index: row,
                extent: self.height(),
            });
        }
        if col == 0 {
            return Err(ExgridError::OutOfRange {
                dimension: "column",
                index: col,
                extent: self.width(),
            });
        }
        let cell_ref = CellRef::new(row, col);
        if self.is_placeholder(row, col) {
            return Err(ExgridError::UnsupportedStructure(format!(
                "{} is a merge placeholder and cannot hold a value",
                cell_ref
            )));
        }
        match value {
            Some(value) => {
                self.grid.entry(cell_ref).or_insert_with(Cell::new_empty).value = Some(value);
            }
            None => {
                if let Some(mut cell) = self.grid.get_mut(&cell_ref) {
                    cell.value = None;
                }
            }
        }
        Ok(())
    }

    /// The merge range covering a cell, if any.
    pub fn merge_at(&self, cell_ref: &CellRef) -> Option<&MergeRange> {
        self.merges.iter().find(|range| range.contains(cell_ref))
    }

    /// Register a merge range. Every non-anchor cell becomes a valueless placeholder.
    pub fn merge_cells(&mut self, range: MergeRange) -> Result<()> {
        if let Some(existing) = self.merges.iter().find(|m| m.overlaps(&range)) {
            return Err(ExgridError::UnsupportedStructure(format!(
                "merge {} overlaps existing merge {}",
                range, existing
            )));
        }
        if range.is_single_cell() {
            return Ok(());
        }
        let anchor = range.anchor();
        for cell_ref in range.cells() {
            if cell_ref == anchor {
                continue;
            }
            let mut cell = self.grid.entry(cell_ref).or_insert_with(Cell::new_empty);
            cell.value = None;
            cell.placeholder = true;
        }
        self.merges.push(range);
        Ok(())
    }

    /// Values of one row across the header columns.
    pub fn row_values(&self, row: usize) -> Vec<Option<CellValue>> {
        self.header_columns().map(|col| self.value(row, col)).collect()
    }

    /// Values of one column across rows 1..=height.
    pub fn column_values(&self, col: usize) -> Vec<Option<CellValue>> {
        (1..=self.height()).map(|row| self.value(row, col)).collect()
    }

    /// Letter of the header-row cell occupying `col`.
    pub fn letter_for_column(&self, col: usize) -> Result<String> {
        if !self.header_columns().contains(&col) {
            return Err(ExgridError::ColumnNotFound(col));
        }
        column_letter(col).ok_or(ExgridError::ColumnNotFound(col))
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        let extent = self.height();
        if row == 0 || row > extent {
            return Err(ExgridError::OutOfRange {
                dimension: "row",
                index: row,
                extent,
            });
        }
        Ok(())
    }
}
