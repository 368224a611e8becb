//! Cell data structures for the worksheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellValue`] - The scalar held by a cell (text, integer or float)
//! - [`CellStyle`] - Opaque visual formatting carried alongside the value
//! - [`Cell`] - A cell with its value, merge-placeholder flag and style
//! - [`Grid`] - Sparse storage for cells (backed by `DashMap`)

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell_ref::CellRef;

/// The scalar stored in a cell. An absent value is `Option::None` on [`Cell`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl CellValue {
    /// Parse raw input into a value.
    /// - Empty string or whitespace -> None
    /// - Integer literal -> Int
    /// - Other numeric literal -> Float
    /// - Otherwise -> Text (untrimmed)
    pub fn parse(input: &str) -> Option<CellValue> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(CellValue::Int(n));
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Some(CellValue::Float(n));
        }
        Some(CellValue::Text(input.to_string()))
    }

    /// True for text that is empty or all whitespace. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Int(_) | CellValue::Float(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Int(_) => "integer",
            CellValue::Float(_) => "float",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(n) => write!(f, "{}", n),
            // Debug formatting keeps the trailing ".0" so floats stay distinguishable.
            CellValue::Float(n) => write!(f, "{:?}", n),
        }
    }
}

/// Font part of a [`CellStyle`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: String,
    pub strike: bool,
    /// ARGB hex, e.g. `FF000000`.
    pub color: String,
}

/// Visual formatting of a cell. Not interpreted by the grid operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub font: FontStyle,
    /// Solid fill colour (ARGB), None for no fill.
    pub fill: Option<String>,
    /// Border style name applied to all four sides, None for no border.
    pub border: Option<String>,
    pub number_format: String,
}

impl CellStyle {
    /// The fixed style every cell gets from a styling reset.
    pub fn plain() -> CellStyle {
        CellStyle {
            font: FontStyle {
                name: "Arial".to_string(),
                size: 10.0,
                bold: false,
                italic: false,
                underline: "none".to_string(),
                strike: false,
                color: "FF000000".to_string(),
            },
            fill: None,
            border: None,
            number_format: "General".to_string(),
        }
    }
}

/// A cell in the worksheet grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Option<CellValue>,
    /// Part of a merge range without being its anchor. Placeholders never hold a value.
    pub placeholder: bool,
    /// None means the workbook default style.
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new_value(value: CellValue) -> Cell {
        Cell {
            value: Some(value),
            ..Cell::default()
        }
    }

    pub fn new_text(text: &str) -> Cell {
        Cell::new_value(CellValue::Text(text.to_string()))
    }

    pub fn new_int(n: i64) -> Cell {
        Cell::new_value(CellValue::Int(n))
    }

    pub fn new_float(n: f64) -> Cell {
        Cell::new_value(CellValue::Float(n))
    }

    pub fn new_placeholder() -> Cell {
        Cell {
            placeholder: true,
            ..Cell::default()
        }
    }

    /// Parse raw input and create a cell (see [`CellValue::parse`]).
    pub fn from_input(input: &str) -> Cell {
        Cell {
            value: CellValue::parse(input),
            ..Cell::default()
        }
    }

    /// Display string for the stored value ("" when absent).
    pub fn to_input_string(&self) -> String {
        self.value.as_ref().map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Sparse grid storage keyed by 1-based cell reference.
pub type Grid = DashMap<CellRef, Cell>;
