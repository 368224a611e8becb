//! Value-level transforms: forward fill, row combination, percent conversion,
//! header-name normalization and styling reset. None of these change the grid shape
//! except `combine_rows`, which finishes by deleting its first row.

use super::Worksheet;
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{
    Cell, CellRef, CellStyle, CellValue, strip_parentheticals, strip_punctuation,
    to_identifier_case,
};

impl Worksheet {
    /// Forward-fill blank cells along `positions`, seeded by the first position.
    fn smear(&mut self, positions: Vec<CellRef>) -> Result<usize> {
        let mut previous: Option<CellValue> = None;
        let mut filled = 0;
        for (idx, pos) in positions.into_iter().enumerate() {
            let value = self.value(pos.row, pos.col);
            if idx == 0 {
                previous = value;
                continue;
            }
            match value {
                Some(v) if !v.is_blank() => previous = Some(v),
                _ => {
                    self.set_value(pos.row, pos.col, previous.clone())?;
                    filled += 1;
                }
            }
        }
        Ok(filled)
    }

    /// Fill blank cells of `row` with the nearest non-blank value to their left.
    /// Returns the number of cells overwritten.
    pub fn smear_row(&mut self, row: usize) -> Result<usize> {
        self.check_row(row)?;
        let positions = self
            .header_columns()
            .map(|col| CellRef::new(row, col))
            .collect();
        self.smear(positions)
    }

    /// Fill blank cells of `col` with the nearest non-blank value above them.
    /// Returns the number of cells overwritten.
    pub fn smear_column(&mut self, col: usize) -> Result<usize> {
        self.letter_for_column(col)?;
        let positions = (1..=self.height()).map(|row| CellRef::new(row, col)).collect();
        self.smear(positions)
    }

    /// Join `row_a` onto `row_b` cell by cell (`a{separator}b`), then delete `row_a`.
    ///
    /// Every column must hold a value in both rows; nothing is written otherwise.
    /// Numbers are joined by their display form rather than rejected.
    pub fn combine_rows(&mut self, row_a: usize, row_b: usize, separator: &str) -> Result<()> {
        self.check_row(row_a)?;
        self.check_row(row_b)?;

        let mut combined = Vec::new();
        for col in self.header_columns() {
            let a = self.value(row_a, col).ok_or(ExgridError::TypeMismatch {
                cell: CellRef::new(row_a, col),
                expected: "a value",
                found: "nothing",
            })?;
            let b = self.value(row_b, col).ok_or(ExgridError::TypeMismatch {
                cell: CellRef::new(row_b, col),
                expected: "a value",
                found: "nothing",
            })?;
            combined.push((col, format!("{}{}{}", a, separator, b)));
        }

        for (col, joined) in combined {
            self.set_value(row_b, col, Some(CellValue::Text(joined)))?;
        }
        self.delete_rows(row_a, row_a)
    }

    /// Multiply float cells of `col` by 100, leaving the first `skip` rows alone.
    /// Integers, text and empty cells are untouched. Returns the number converted.
    pub fn convert_column_to_percent(&mut self, col: usize, skip: usize) -> Result<usize> {
        self.letter_for_column(col)?;
        let mut converted = 0;
        for row in (1..=self.height()).skip(skip) {
            if let Some(mut cell) = self.grid.get_mut(&CellRef::new(row, col))
                && let Some(CellValue::Float(n)) = cell.value
                && n != 0.0
            {
                cell.value = Some(CellValue::Float(n * 100.0));
                converted += 1;
            }
        }
        Ok(converted)
    }

    /// Rewrite every header-column cell of `row` as an identifier
    /// ("Net Sales (USD)" -> "netSales"). All cells must hold text.
    pub fn apply_name_normalization(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        let mut normalized = Vec::new();
        for col in self.header_columns() {
            let found = match self.value(row, col) {
                Some(CellValue::Text(s)) => {
                    let name = to_identifier_case(&strip_punctuation(&strip_parentheticals(&s)));
                    normalized.push((col, name));
                    continue;
                }
                Some(other) => other.kind(),
                None => "nothing",
            };
            return Err(ExgridError::TypeMismatch {
                cell: CellRef::new(row, col),
                expected: "text",
                found,
            });
        }

        for (col, name) in normalized {
            self.set_value(row, col, Some(CellValue::Text(name)))?;
        }
        Ok(())
    }

    /// Replace the style of every cell within the extent with [`CellStyle::plain`].
    /// Returns the number of cells restyled.
    pub fn reset_styling(&mut self) -> usize {
        let (height, width) = (self.height(), self.width());
        for row in 1..=height {
            for col in 1..=width {
                self.grid
                    .entry(CellRef::new(row, col))
                    .or_insert_with(Cell::new_empty)
                    .style = Some(CellStyle::plain());
            }
        }
        tracing::debug!(sheet = %self.name, cells = height * width, "styling reset");
        height * width
    }
}

#[cfg(test)]
mod tests {
    use super::Worksheet;
    use crate::error::ExgridError;
    use exgrid_engine::engine::{CellRef, CellStyle, CellValue, MergeRange};

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    fn row_sheet(values: &[Option<CellValue>]) -> Worksheet {
        let mut sheet = Worksheet::new("Sheet1");
        for (idx, value) in values.iter().enumerate() {
            sheet
                .grid
                .entry(CellRef::new(1, idx + 1))
                .or_default()
                .value = value.clone();
        }
        sheet
    }

    #[test]
    fn test_smear_row() {
        let mut sheet = row_sheet(&[text("Q1"), None, None, text("Q2"), text("")]);
        let filled = sheet.smear_row(1).unwrap();
        assert_eq!(filled, 3);
        assert_eq!(
            sheet.row_values(1),
            vec![text("Q1"), text("Q1"), text("Q1"), text("Q2"), text("Q2")]
        );
    }

    #[test]
    fn test_smear_treats_numbers_as_present() {
        let mut sheet = row_sheet(&[text("a"), Some(CellValue::Int(0)), text("  "), None]);
        sheet.smear_row(1).unwrap();
        assert_eq!(
            sheet.row_values(1),
            vec![
                text("a"),
                Some(CellValue::Int(0)),
                Some(CellValue::Int(0)),
                Some(CellValue::Int(0))
            ]
        );
    }

    #[test]
    fn test_smear_seed_may_be_empty() {
        let mut sheet = row_sheet(&[None, text(" "), text("x"), None]);
        sheet.smear_row(1).unwrap();
        assert_eq!(sheet.row_values(1), vec![None, None, text("x"), text("x")]);
    }

    #[test]
    fn test_smear_column() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("Group")).unwrap();
        sheet.set_value(2, 1, text("North")).unwrap();
        sheet.set_value(4, 1, text("South")).unwrap();
        sheet.set_value(5, 2, Some(CellValue::Int(9))).unwrap();
        sheet.smear_column(1).unwrap();
        assert_eq!(
            sheet.column_values(1),
            vec![text("Group"), text("North"), text("North"), text("South"), text("South")]
        );
    }

    #[test]
    fn test_smear_column_requires_header_column() {
        let mut sheet = row_sheet(&[text("a")]);
        assert!(matches!(
            sheet.smear_column(2),
            Err(ExgridError::ColumnNotFound(2))
        ));
    }

    #[test]
    fn test_combine_rows() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("a")).unwrap();
        sheet.set_value(1, 2, text("b")).unwrap();
        sheet.set_value(2, 1, text("c")).unwrap();
        sheet.set_value(2, 2, text("d")).unwrap();
        sheet.set_value(3, 1, text("tail")).unwrap();

        sheet.combine_rows(1, 2, ":").unwrap();
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.row_values(1), vec![text("a:c"), text("b:d")]);
        assert_eq!(sheet.value(2, 1), text("tail"));
    }

    #[test]
    fn test_combine_rows_joins_numbers_by_display() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("FY")).unwrap();
        sheet.set_value(2, 1, Some(CellValue::Int(2024))).unwrap();
        sheet.combine_rows(1, 2, " ").unwrap();
        assert_eq!(sheet.value(1, 1), text("FY 2024"));
    }

    #[test]
    fn test_combine_rows_absent_value_is_type_mismatch() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("a")).unwrap();
        sheet.set_value(1, 2, text("b")).unwrap();
        sheet.set_value(2, 1, text("c")).unwrap();
        let result = sheet.combine_rows(1, 2, ":");
        assert!(matches!(
            result,
            Err(ExgridError::TypeMismatch { cell, .. }) if cell == CellRef::new(2, 2)
        ));
        assert_eq!(sheet.value(2, 1), text("c"));
        assert_eq!(sheet.height(), 2);
    }

    #[test]
    fn test_convert_column_to_percent() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("Share")).unwrap();
        sheet.set_value(2, 1, Some(CellValue::Float(0.25))).unwrap();
        sheet.set_value(3, 1, Some(CellValue::Int(3))).unwrap();
        sheet.set_value(4, 1, text("n/a")).unwrap();
        sheet.set_value(6, 1, Some(CellValue::Float(1.5))).unwrap();

        let converted = sheet.convert_column_to_percent(1, 1).unwrap();
        assert_eq!(converted, 2);
        assert_eq!(
            sheet.column_values(1),
            vec![
                text("Share"),
                Some(CellValue::Float(25.0)),
                Some(CellValue::Int(3)),
                text("n/a"),
                None,
                Some(CellValue::Float(150.0)),
            ]
        );
    }

    #[test]
    fn test_convert_column_to_percent_honours_skip() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, Some(CellValue::Float(0.1))).unwrap();
        sheet.set_value(2, 1, Some(CellValue::Float(0.2))).unwrap();
        sheet.set_value(3, 1, Some(CellValue::Float(0.5))).unwrap();
        sheet.convert_column_to_percent(1, 2).unwrap();
        assert_eq!(sheet.value(1, 1), Some(CellValue::Float(0.1)));
        assert_eq!(sheet.value(2, 1), Some(CellValue::Float(0.2)));
        assert_eq!(sheet.value(3, 1), Some(CellValue::Float(50.0)));
    }

    #[test]
    fn test_convert_column_to_percent_skip_past_every_row() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, Some(CellValue::Float(0.1))).unwrap();
        sheet.set_value(2, 1, Some(CellValue::Float(0.2))).unwrap();
        assert_eq!(sheet.convert_column_to_percent(1, usize::MAX).unwrap(), 0);
        assert_eq!(sheet.value(1, 1), Some(CellValue::Float(0.1)));
        assert_eq!(sheet.value(2, 1), Some(CellValue::Float(0.2)));
    }

    #[test]
    fn test_apply_name_normalization() {
        let mut sheet = row_sheet(&[text("Net Sales (USD)"), text("unit_price"), text("Q1: growth%")]);
        sheet.apply_name_normalization(1).unwrap();
        assert_eq!(
            sheet.row_values(1),
            vec![text("netSales"), text("unitprice"), text("q1Growth")]
        );
    }

    #[test]
    fn test_apply_name_normalization_rejects_non_text() {
        let mut sheet = row_sheet(&[text("Name"), Some(CellValue::Int(7))]);
        let result = sheet.apply_name_normalization(1);
        assert!(matches!(
            result,
            Err(ExgridError::TypeMismatch { found: "integer", .. })
        ));
        assert_eq!(sheet.value(1, 1), text("Name"));
    }

    #[test]
    fn test_reset_styling_covers_extent() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_value(1, 1, text("a")).unwrap();
        sheet.set_value(2, 3, text("b")).unwrap();
        let count = sheet.reset_styling();
        assert_eq!(count, 6);
        for entry in sheet.grid.iter() {
            assert_eq!(entry.style, Some(CellStyle::plain()));
        }
        assert_eq!(sheet.grid.len(), 6);
    }

    #[test]
    fn test_smear_into_placeholder_fails() {
        let mut sheet = row_sheet(&[text("a"), text("b"), None]);
        sheet
            .merge_cells(MergeRange::from_str("B1:C1").unwrap())
            .unwrap();
        assert!(matches!(
            sheet.smear_row(1),
            Err(ExgridError::UnsupportedStructure(_))
        ));
    }
}
