//! .xlsx import/export through umya-spreadsheet
//!
//! Values, merge ranges and a subset of styling (font, solid fill, border
//! style, number format) survive a load/save cycle. Formulas are read as
//! their cached values.

use crate::document::{Workbook, Worksheet};
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{Cell, CellRef, CellStyle, CellValue, FontStyle, MergeRange};
use std::path::Path;
use umya_spreadsheet::{PatternValues, Style};

fn xlsx_error(err: impl std::fmt::Display) -> ExgridError {
    ExgridError::Xlsx(err.to_string())
}

/// Read every sheet of an .xlsx file, in workbook order.
pub fn read_xlsx(path: &Path) -> Result<Workbook> {
    let source = umya_spreadsheet::reader::xlsx::read(path).map_err(xlsx_error)?;
    let mut book = Workbook::new();

    for xl_sheet in source.get_sheet_collection() {
        let name = xl_sheet.get_name().to_string();
        let mut sheet = Worksheet::new(&name);

        for xl_cell in xl_sheet.get_cell_collection() {
            let coord = xl_cell.get_coordinate();
            let cell_ref = CellRef::new(*coord.get_row_num() as usize, *coord.get_col_num() as usize);
            let cell = Cell {
                value: value_from_text(&xl_cell.get_value()),
                placeholder: false,
                style: style_from_xlsx(xl_cell.get_style()),
            };
            if cell.value.is_some() || cell.style.is_some() {
                sheet.grid.insert(cell_ref, cell);
            }
        }

        for xl_range in xl_sheet.get_merge_cells() {
            let text = xl_range.get_range();
            let range = MergeRange::from_str(&text)
                .ok_or_else(|| xlsx_error(format!("invalid merge range {} in {}", text, name)))?;
            sheet.merge_cells(range)?;
        }

        if book.sheets.insert(name.clone(), sheet).is_some() {
            return Err(ExgridError::DuplicateSheet(name));
        }
    }

    Ok(book)
}

/// Numbers are inferred from the stored text; everything else is kept as text.
fn value_from_text(raw: &str) -> Option<CellValue> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(CellValue::Int(n));
    }
    if let Ok(n) = raw.parse::<f64>() {
        return Some(CellValue::Float(n));
    }
    Some(CellValue::Text(raw.to_string()))
}

fn style_from_xlsx(style: &Style) -> Option<CellStyle> {
    let font = style.get_font()?;
    let plain = CellStyle::plain();

    let fill = style
        .get_fill()
        .and_then(|fill| fill.get_pattern_fill())
        .and_then(|pattern| pattern.get_foreground_color())
        .map(|color| color.get_argb().to_string())
        .filter(|argb| !argb.is_empty());

    let border = style
        .get_borders()
        .map(|borders| borders.get_left_border().get_border_style().to_string())
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("none"));

    let number_format = style
        .get_number_format()
        .map(|fmt| fmt.get_format_code().to_string())
        .unwrap_or(plain.number_format);

    let color = font.get_color().get_argb();
    Some(CellStyle {
        font: FontStyle {
            name: Some(font.get_name().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or(plain.font.name),
            size: Some(*font.get_size())
                .filter(|size| *size > 0.0)
                .unwrap_or(plain.font.size),
            bold: *font.get_bold(),
            italic: *font.get_italic(),
            underline: font.get_underline().to_string(),
            strike: *font.get_strikethrough(),
            color: if color.is_empty() {
                plain.font.color
            } else {
                color.to_string()
            },
        },
        fill,
        border,
        number_format,
    })
}

fn apply_style(target: &mut Style, style: &CellStyle) {
    let font = target.get_font_mut();
    font.set_name(style.font.name.clone());
    font.set_size(style.font.size);
    font.set_bold(style.font.bold);
    font.set_italic(style.font.italic);
    font.set_underline(style.font.underline.clone());
    font.set_strikethrough(style.font.strike);
    font.get_color_mut().set_argb(style.font.color.clone());

    let pattern = target.get_fill_mut().get_pattern_fill_mut();
    match &style.fill {
        Some(argb) => {
            pattern.set_pattern_type(PatternValues::Solid);
            pattern.get_foreground_color_mut().set_argb(argb.clone());
        }
        None => {
            pattern.set_pattern_type(PatternValues::None);
        }
    }

    let border_style = style.border.clone().unwrap_or_else(|| "none".to_string());
    let borders = target.get_borders_mut();
    borders
        .get_left_border_mut()
        .set_border_style(border_style.clone());
    borders
        .get_right_border_mut()
        .set_border_style(border_style.clone());
    borders
        .get_top_border_mut()
        .set_border_style(border_style.clone());
    borders.get_bottom_border_mut().set_border_style(border_style);

    target
        .get_number_format_mut()
        .set_format_code(style.number_format.clone());
}

/// Write every sheet to an .xlsx file.
pub fn write_xlsx(path: &Path, book: &Workbook) -> Result<()> {
    let mut out = umya_spreadsheet::new_file_empty_worksheet();

    for sheet in book.sheets.values() {
        let target = out.new_sheet(&sheet.name).map_err(xlsx_error)?;

        for entry in sheet.grid.iter() {
            let coordinate = entry.key().to_string();
            let xl_cell = target.get_cell_mut(coordinate.as_str());
            match &entry.value {
                Some(CellValue::Text(s)) => {
                    xl_cell.set_value_string(s.clone());
                }
                Some(CellValue::Int(n)) => {
                    xl_cell.set_value_number(*n as f64);
                }
                Some(CellValue::Float(n)) => {
                    xl_cell.set_value_number(*n);
                }
                None => {}
            }
            if let Some(style) = &entry.style {
                apply_style(xl_cell.get_style_mut(), style);
            }
        }

        for range in &sheet.merges {
            target.add_merge_cells(range.to_string());
        }
    }

    umya_spreadsheet::writer::xlsx::write(&out, path).map_err(xlsx_error)?;
    Ok(())
}
