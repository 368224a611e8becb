use super::Worksheet;
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{CellRef, CellValue, MergeRange};

impl Worksheet {
    /// Unmerge every single-row merge in `row`, repeating each anchor's value
    /// across the cells it covered.
    ///
    /// Runs of placeholder cells are found by scanning the header columns; the
    /// anchor of a run is the cell immediately to its left. Returns the ranges
    /// that were dissolved, left to right.
    pub fn unmerge_row(&mut self, row: usize) -> Result<Vec<MergeRange>> {
        self.check_row(row)?;

        // Maximal runs of placeholder columns
        let mut runs: Vec<(usize, usize)> = Vec::new();
        let mut current: Option<(usize, usize)> = None;
        for col in self.header_columns() {
            if self.is_placeholder(row, col) {
                current = match current {
                    Some((start, _)) => Some((start, col)),
                    None => Some((col, col)),
                };
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);

        // Capture anchor values before touching anything
        let mut resolved: Vec<(MergeRange, Option<CellValue>)> = Vec::with_capacity(runs.len());
        for (start, end) in runs {
            if start == 1 {
                return Err(ExgridError::OutOfRange {
                    dimension: "column",
                    index: 0,
                    extent: self.width(),
                });
            }
            let anchor_col = start - 1;
            let range = MergeRange {
                row_start: row,
                row_end: row,
                col_start: anchor_col,
                col_end: end,
            };
            if !self.merges.contains(&range) {
                return Err(ExgridError::UnsupportedStructure(format!(
                    "no single-row merge {} in sheet {}",
                    range, self.name
                )));
            }
            resolved.push((range, self.value(row, anchor_col)));
        }

        tracing::debug!(sheet = %self.name, row, ranges = resolved.len(), "unmerging row");

        for (range, value) in &resolved {
            self.merges.retain(|m| m != range);
            for col in range.col_start..=range.col_end {
                let mut cell = self.grid.entry(CellRef::new(row, col)).or_default();
                cell.placeholder = false;
                cell.value = value.clone();
            }
        }

        Ok(resolved.into_iter().map(|(range, _)| range).collect())
    }
}
