use super::Workbook;
use crate::error::{ExgridError, Result};
use crate::storage::{parse_csv, parse_grd, read_xlsx, write_csv, write_grd, write_xlsx};
use std::path::{Path, PathBuf};

/// File formats, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Grd,
    Xlsx,
    Csv,
}

impl Format {
    fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("grd") => Ok(Format::Grd),
            Some("xlsx") => Ok(Format::Xlsx),
            Some("csv") => Ok(Format::Csv),
            _ => Err(ExgridError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl Workbook {
    /// Load a workbook from a .grd, .xlsx or .csv file.
    pub fn load(path: &Path) -> Result<Workbook> {
        let mut book = match Format::from_path(path)? {
            Format::Grd => parse_grd(path)?,
            Format::Xlsx => read_xlsx(path)?,
            Format::Csv => Workbook {
                sheets: [(String::from("Sheet1"), parse_csv(path)?)].into_iter().collect(),
                ..Workbook::new()
            },
        };
        book.file_path = Some(path.to_path_buf());
        book.modified = false;
        tracing::info!(path = %path.display(), sheets = book.sheets.len(), "workbook loaded");
        Ok(book)
    }

    /// Save to `path`, which becomes the workbook's file path.
    ///
    /// CSV holds a single sheet, so saving to .csv writes the first sheet only.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        match Format::from_path(path)? {
            Format::Grd => write_grd(path, self)?,
            Format::Xlsx => write_xlsx(path, self)?,
            Format::Csv => {
                let name = self.resolve_sheet(None)?;
                write_csv(path, self.sheet(&name)?)?;
            }
        }
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        tracing::info!(path = %path.display(), "workbook saved");
        Ok(())
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(ExgridError::NoFilePath);
        };
        self.save(&path)?;
        Ok(path)
    }

    /// Export one sheet's values to CSV.
    pub fn export_sheet_csv(&self, sheet: &str, path: &Path) -> Result<()> {
        write_csv(path, self.sheet(sheet)?)?;
        tracing::info!(sheet, path = %path.display(), "sheet exported");
        Ok(())
    }
}
