//! Writer for the .grd workbook format

use crate::document::{Workbook, Worksheet};
use crate::error::Result;
use exgrid_engine::engine::CellValue;
use std::fs;
use std::path::Path;

/// Write a workbook to a .grd file
pub fn write_grd(path: &Path, book: &Workbook) -> Result<()> {
    fs::write(path, write_grd_content(book))?;
    Ok(())
}

/// Write a workbook to a .grd format string
pub fn write_grd_content(book: &Workbook) -> String {
    let mut lines = vec!["# exgrid workbook".to_string()];
    for sheet in book.sheets.values() {
        lines.push(String::new());
        lines.push(format!("[{}]", sheet.name));
        write_sheet(sheet, &mut lines);
    }
    lines.join("\n") + "\n"
}

fn write_sheet(sheet: &Worksheet, lines: &mut Vec<String>) {
    // Sort by position for consistent output
    let mut cells: Vec<_> = sheet
        .grid
        .iter()
        .filter_map(|entry| entry.value.clone().map(|value| (*entry.key(), value)))
        .collect();
    cells.sort_by(|a, b| a.0.cmp(&b.0));

    for (cell_ref, value) in cells {
        let value_str = match &value {
            CellValue::Text(s) => format!("\"{}\"", escape_grd_text(s)),
            number => number.to_string(),
        };
        lines.push(format!("{}: {}", cell_ref, value_str));
    }

    for range in &sheet.merges {
        lines.push(format!("merge: {}", range));
    }
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
