//! CSV import/export for a single worksheet

use crate::document::Worksheet;
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellRef, CellValue};
use std::path::Path;

/// Parse a CSV file into a worksheet named `Sheet1`.
pub fn parse_csv(path: &Path) -> Result<Worksheet> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_content(&content)
}

/// Parse CSV text into a worksheet named `Sheet1`. Empty fields create no cell.
pub fn parse_csv_content(content: &str) -> Result<Worksheet> {
    let sheet = Worksheet::new("Sheet1");

    for (row_idx, line) in content.lines().enumerate() {
        for (col_idx, field) in parse_csv_line(line).into_iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let cell_ref = CellRef::new(row_idx + 1, col_idx + 1);
            sheet.grid.insert(cell_ref, parse_csv_field(&field));
        }
    }

    if sheet.grid.is_empty() {
        return Err(ExgridError::EmptyCsv);
    }
    Ok(sheet)
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                field_was_quoted = true;
            }
            ',' => {
                let field = std::mem::take(&mut current);
                fields.push(if field_was_quoted {
                    field
                } else {
                    field.trim().to_string()
                });
                field_was_quoted = false;
            }
            _ => current.push(c),
        }
    }
    fields.push(if field_was_quoted {
        current
    } else {
        current.trim().to_string()
    });
    fields
}

/// Parse a CSV field into a cell
/// - Integer literal -> Int (unless it has leading zeros like "007")
/// - Other numeric literal -> Float
/// - Otherwise -> Text, surrounding whitespace kept
pub(crate) fn parse_csv_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() || field != trimmed {
        return Cell::new_text(field);
    }

    // Identifiers such as "007" stay text
    if trimmed.starts_with('0')
        && trimmed.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return Cell::new_text(trimmed);
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return Cell::new_int(n);
    }
    // "inf" and "NaN" parse as floats but are words here
    if trimmed.chars().any(|c| c.is_ascii_digit())
        && let Ok(n) = trimmed.parse::<f64>()
    {
        return Cell::new_float(n);
    }

    Cell::new_text(trimmed)
}

/// Export a worksheet to a CSV file.
pub fn write_csv(path: &Path, sheet: &Worksheet) -> Result<()> {
    std::fs::write(path, write_csv_content(sheet))?;
    Ok(())
}

/// One line per row `1..=height`, one field per column `1..=width`.
/// Absent values (placeholders included) are written as empty fields.
pub fn write_csv_content(sheet: &Worksheet) -> String {
    let mut out = String::new();
    for row in 1..=sheet.height() {
        let fields: Vec<String> = (1..=sheet.width())
            .map(|col| {
                sheet
                    .value(row, col)
                    .map(|value| escape_csv_field(&value_text(&value)))
                    .unwrap_or_default()
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn value_text(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
