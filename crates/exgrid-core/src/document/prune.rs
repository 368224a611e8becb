use super::Worksheet;
use super::ops::Dimension;
use crate::error::Result;

impl Worksheet {
    /// True when no cell on the given row/column holds a value.
    fn line_is_empty(&self, dim: Dimension, index: usize) -> bool {
        !self
            .grid
            .iter()
            .any(|entry| dim.get_coord(entry.key()) == index && entry.value.is_some())
    }

    fn first_empty(&self, dim: Dimension) -> Option<usize> {
        (1..=self.extent(dim)).find(|&index| self.line_is_empty(dim, index))
    }

    /// Delete empty lines until a full scan finds none, restarting from the
    /// first index after every deletion.
    fn remove_empty(&mut self, dim: Dimension) -> Result<Vec<usize>> {
        let mut deleted = Vec::new();
        while let Some(index) = self.first_empty(dim) {
            match dim {
                Dimension::Row => self.delete_rows(index, index)?,
                Dimension::Column => self.delete_columns(index, index)?,
            }
            tracing::debug!(sheet = %self.name, dimension = dim.label(), index, "removed empty line");
            deleted.push(index);
        }
        Ok(deleted)
    }

    /// Remove every row without a value. Returns the deleted indices in
    /// deletion order, each relative to the grid at the time it was removed.
    pub fn remove_empty_rows(&mut self) -> Result<Vec<usize>> {
        self.remove_empty(Dimension::Row)
    }

    /// Remove every column without a value. See [`Worksheet::remove_empty_rows`].
    pub fn remove_empty_columns(&mut self) -> Result<Vec<usize>> {
        self.remove_empty(Dimension::Column)
    }
}

#[cfg(test)]
mod tests {
    use super::Worksheet;
    use exgrid_engine::engine::{Cell, CellRef, CellStyle, CellValue};

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    #[test]
    fn test_remove_empty_rows() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("x")).unwrap();
        sheet.set_value(4, 1, text("y")).unwrap();

        let deleted = sheet.remove_empty_rows().unwrap();
        assert_eq!(deleted, vec![2, 2]);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.column_values(1), vec![text("x"), text("y")]);
    }

    #[test]
    fn test_remove_empty_rows_counts_blank_text_as_value() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("x")).unwrap();
        sheet.set_value(2, 2, text("")).unwrap();
        sheet.set_value(3, 1, text("y")).unwrap();
        assert!(sheet.remove_empty_rows().unwrap().is_empty());
        assert_eq!(sheet.height(), 3);
    }

    #[test]
    fn test_styled_cells_without_values_are_empty() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("x")).unwrap();
        sheet.grid.insert(
            CellRef::new(2, 1),
            Cell {
                style: Some(CellStyle::plain()),
                ..Cell::default()
            },
        );
        assert_eq!(sheet.remove_empty_rows().unwrap(), vec![2]);
        assert_eq!(sheet.height(), 1);
    }

    #[test]
    fn test_remove_empty_columns() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 2, text("a")).unwrap();
        sheet.set_value(3, 4, text("b")).unwrap();

        let deleted = sheet.remove_empty_columns().unwrap();
        assert_eq!(deleted, vec![1, 2]);
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.value(1, 1), text("a"));
        assert_eq!(sheet.value(3, 2), text("b"));
    }

    #[test]
    fn test_empty_sheet_has_nothing_to_remove() {
        let mut sheet = Worksheet::new("Sheet1");
        assert!(sheet.remove_empty_rows().unwrap().is_empty());
        assert!(sheet.remove_empty_columns().unwrap().is_empty());
    }
}
