use super::Workbook;
use exgrid_engine::engine::column_letter;
use indexmap::IndexMap;
use serde::Serialize;

/// Row and column bounds of one worksheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetShape {
    pub sheet_name: String,
    pub first_column: usize,
    pub last_column: usize,
    pub first_column_letter: String,
    pub last_column_letter: String,
    pub first_row: usize,
    pub last_row: usize,
}

/// Shape of every sheet, in workbook order.
///
/// Columns come from the header-row scan and rows from a scan of column A,
/// so an empty sheet still reports a single cell at A1.
pub fn describe_shape(workbook: &Workbook) -> IndexMap<String, SheetShape> {
    workbook
        .sheets
        .iter()
        .map(|(name, sheet)| {
            let last_column = sheet.width().max(1);
            let last_row = sheet.height().max(1);
            let shape = SheetShape {
                sheet_name: name.clone(),
                first_column: 1,
                last_column,
                first_column_letter: "A".to_string(),
                last_column_letter: column_letter(last_column).unwrap_or_default(),
                first_row: 1,
                last_row,
            };
            (name.clone(), shape)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exgrid_engine::engine::CellValue;

    #[test]
    fn test_describe_shape() {
        let mut book = Workbook::with_sheet("Data");
        book.add_sheet("Empty").unwrap();
        book.set_cell_value("Data", 1, 1, CellValue::parse("id"))
            .unwrap();
        book.set_cell_value("Data", 12, 28, CellValue::parse("x"))
            .unwrap();

        let shapes = describe_shape(&book);
        assert_eq!(shapes.keys().collect::<Vec<_>>(), vec!["Data", "Empty"]);

        let data = &shapes["Data"];
        assert_eq!((data.first_column, data.last_column), (1, 28));
        assert_eq!(data.last_column_letter, "AB");
        assert_eq!((data.first_row, data.last_row), (1, 12));

        let empty = &shapes["Empty"];
        assert_eq!((empty.last_column, empty.last_row), (1, 1));
        assert_eq!(empty.first_column_letter, empty.last_column_letter);
    }
}
