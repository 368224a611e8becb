use super::Worksheet;
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellValue};
use indexmap::IndexMap;
use std::path::PathBuf;

/// An ordered collection of uniquely named worksheets.
#[derive(Clone, Debug, Default)]
pub struct Workbook {
    /// Sheets in workbook order
    pub sheets: IndexMap<String, Worksheet>,
    /// File the workbook was loaded from or last saved to
    pub file_path: Option<PathBuf>,
    /// Whether any sheet has been handed out for mutation since the last load/save
    pub modified: bool,
}

impl Workbook {
    /// Create an empty workbook.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Workbook {
            sheets: IndexMap::new(),
            file_path: None,
            modified: false,
        }
    }

    /// Create a workbook holding one empty sheet.
    pub fn with_sheet(name: &str) -> Self {
        let mut book = Self::new();
        book.sheets.insert(name.to_string(), Worksheet::new(name));
        book
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| ExgridError::SheetNotFound(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        let sheet = self
            .sheets
            .get_mut(name)
            .ok_or_else(|| ExgridError::SheetNotFound(name.to_string()))?;
        self.modified = true;
        Ok(sheet)
    }

    /// Append a new empty sheet.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        if self.sheets.contains_key(name) {
            return Err(ExgridError::DuplicateSheet(name.to_string()));
        }
        self.modified = true;
        Ok(self
            .sheets
            .entry(name.to_string())
            .or_insert_with(|| Worksheet::new(name)))
    }

    /// Remove a sheet, keeping the order of the others.
    pub fn remove_sheet(&mut self, name: &str) -> Result<Worksheet> {
        let sheet = self
            .sheets
            .shift_remove(name)
            .ok_or_else(|| ExgridError::SheetNotFound(name.to_string()))?;
        self.modified = true;
        Ok(sheet)
    }

    /// Set the value of a particular cell.
    pub fn set_cell_value(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: Option<CellValue>,
    ) -> Result<()> {
        self.sheet_mut(sheet)?.set_value(row, col, value)
    }

    /// Build a new workbook holding a values-only copy of one sheet.
    ///
    /// Merges and styles are not carried over.
    pub fn new_workbook_from_sheet(&self, name: &str) -> Result<Workbook> {
        let source = self.sheet(name)?;
        let book = Workbook::with_sheet(name);
        if let Some(target) = book.sheets.get(name) {
            for entry in source.grid.iter() {
                if let Some(value) = &entry.value {
                    target
                        .grid
                        .insert(*entry.key(), Cell::new_value(value.clone()));
                }
            }
        }
        Ok(book)
    }
}
