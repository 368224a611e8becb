//! Parser for the .grd workbook format
//!
//! ```text
//! # comment
//! [Sheet Name]
//! A1: 42
//! B1: 0.5
//! C1: "text"
//! merge: B2:D2
//! ```
//!
//! Cells that appear before any section header belong to `Sheet1`.

use crate::document::{Workbook, Worksheet};
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellRef, MergeRange};
use std::fs;
use std::path::Path;

const DEFAULT_SHEET: &str = "Sheet1";

/// Parse a .grd file into a workbook
pub fn parse_grd(path: &Path) -> Result<Workbook> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

fn parse_error(line: usize, message: impl Into<String>) -> ExgridError {
    ExgridError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Workbook> {
    let mut book = Workbook::new();
    let mut current: Option<String> = None;
    // Merges are applied once every cell of the workbook is in place
    let mut merges: Vec<(String, MergeRange, usize)> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            if name.is_empty() {
                return Err(parse_error(line_num, "Empty sheet name"));
            }
            if book.sheets.contains_key(name) {
                return Err(parse_error(line_num, format!("Duplicate sheet: {}", name)));
            }
            book.sheets.insert(name.to_string(), Worksheet::new(name));
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value_str)) = line.split_once(':') else {
            return Err(parse_error(line_num, "Expected 'CELLREF: VALUE' format"));
        };
        let key = key.trim();

        let sheet_name = match &current {
            Some(name) => name.clone(),
            None => {
                book.sheets
                    .entry(DEFAULT_SHEET.to_string())
                    .or_insert_with(|| Worksheet::new(DEFAULT_SHEET));
                current = Some(DEFAULT_SHEET.to_string());
                DEFAULT_SHEET.to_string()
            }
        };

        if key.eq_ignore_ascii_case("merge") {
            let range = MergeRange::from_str(value_str.trim()).ok_or_else(|| {
                parse_error(line_num, format!("Invalid merge range: {}", value_str.trim()))
            })?;
            merges.push((sheet_name, range, line_num));
            continue;
        }

        let cell_ref = CellRef::from_str(key)
            .ok_or_else(|| parse_error(line_num, format!("Invalid cell reference: {}", key)))?;
        let cell = parse_cell_value(value_str, line_num)?;
        if let Some(sheet) = book.sheets.get(&sheet_name) {
            sheet.grid.insert(cell_ref, cell);
        }
    }

    for (sheet_name, range, line_num) in merges {
        if let Some(sheet) = book.sheets.get_mut(&sheet_name) {
            sheet
                .merge_cells(range)
                .map_err(|e| parse_error(line_num, e.to_string()))?;
        }
    }

    if book.sheets.is_empty() {
        book.sheets
            .insert(DEFAULT_SHEET.to_string(), Worksheet::new(DEFAULT_SHEET));
    }
    Ok(book)
}

/// Parse a cell value string into a Cell
fn parse_cell_value(value: &str, line_num: usize) -> Result<Cell> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(Cell::new_empty());
    }

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let text = &value[1..value.len() - 1];
        return Ok(Cell::new_text(&unescape_grd_text(text)));
    }

    if let Ok(n) = value.parse::<i64>() {
        return Ok(Cell::new_int(n));
    }
    if let Ok(n) = value.parse::<f64>() {
        return Ok(Cell::new_float(n));
    }

    Err(parse_error(
        line_num,
        format!("Invalid value: {}. Use quotes for text.", value),
    ))
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
