//! Named grid operations, their textual command form, and TOML recipes.
//!
//! A recipe is a list of `[[step]]` tables, each naming an operation through
//! its `op` key:
//!
//! ```toml
//! sheet = "Data"
//!
//! [[step]]
//! op = "unmerge-row"
//! row = 2
//!
//! [[step]]
//! op = "combine-rows"
//! first = 1
//! second = 2
//! separator = " "
//! ```

use super::{Workbook, Worksheet};
use crate::error::{ExgridError, Result};
use exgrid_engine::engine::{CellRef, CellValue, MergeRange, column_number};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_RECIPE_BYTES: u64 = 1_048_576; // 1 MiB

/// One grid mutation, addressable by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    DeleteRows {
        start: usize,
        end: usize,
    },
    DeleteColumns {
        start: usize,
        end: usize,
    },
    InsertRow {
        at: usize,
    },
    InsertColumn {
        at: usize,
    },
    MoveRow {
        from: usize,
        to: usize,
    },
    MoveColumn {
        from: usize,
        to: usize,
    },
    Merge {
        range: String,
    },
    UnmergeRow {
        row: usize,
    },
    SmearRow {
        row: usize,
    },
    SmearColumn {
        column: usize,
    },
    CombineRows {
        first: usize,
        second: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
    },
    ConvertColumnToPercent {
        column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skip: Option<usize>,
    },
    NormalizeNames {
        row: usize,
    },
    ResetStyling,
    RemoveEmptyRows,
    RemoveEmptyColumns,
    SetCell {
        cell: String,
        value: String,
    },
}

/// Fallbacks for operation arguments that may be left out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationDefaults {
    pub combine_separator: String,
    pub percent_skip: usize,
}

impl Default for OperationDefaults {
    fn default() -> Self {
        OperationDefaults {
            combine_separator: ":".to_string(),
            percent_skip: 1,
        }
    }
}

fn invalid(message: impl Into<String>) -> ExgridError {
    ExgridError::InvalidCommand(message.into())
}

fn parse_index(token: &str, what: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| invalid(format!("expected a {} number, got '{}'", what, token)))
}

/// Column arguments accept either a 1-based number or letters ("C").
fn parse_column(token: &str) -> Result<usize> {
    if let Ok(n) = token.parse::<usize>() {
        return Ok(n);
    }
    column_number(token).ok_or_else(|| invalid(format!("expected a column, got '{}'", token)))
}

impl Operation {
    /// Parse the textual form, e.g. `delete-rows 2 3` or `smear-column B`.
    pub fn parse_command(input: &str) -> Result<Operation> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Err(invalid("empty command"));
        };

        let arity = |min: usize, max: usize| -> Result<()> {
            if args.len() < min || args.len() > max {
                let expected = if min == max {
                    format!("{}", min)
                } else {
                    format!("{} to {}", min, max)
                };
                return Err(invalid(format!(
                    "{} takes {} argument(s), got {}",
                    name,
                    expected,
                    args.len()
                )));
            }
            Ok(())
        };

        let op = match name {
            "delete-rows" | "delete-columns" => {
                arity(1, 2)?;
                let parse: fn(&str) -> Result<usize> = if name == "delete-rows" {
                    |t| parse_index(t, "row")
                } else {
                    parse_column
                };
                let start = parse(args[0])?;
                let end = match args.get(1) {
                    Some(t) => parse(*t)?,
                    None => start,
                };
                if name == "delete-rows" {
                    Operation::DeleteRows { start, end }
                } else {
                    Operation::DeleteColumns { start, end }
                }
            }
            "insert-row" => {
                arity(1, 1)?;
                Operation::InsertRow {
                    at: parse_index(args[0], "row")?,
                }
            }
            "insert-column" => {
                arity(1, 1)?;
                Operation::InsertColumn {
                    at: parse_column(args[0])?,
                }
            }
            "move-row" => {
                arity(2, 2)?;
                Operation::MoveRow {
                    from: parse_index(args[0], "row")?,
                    to: parse_index(args[1], "row")?,
                }
            }
            "move-column" => {
                arity(2, 2)?;
                Operation::MoveColumn {
                    from: parse_column(args[0])?,
                    to: parse_column(args[1])?,
                }
            }
            "merge" => {
                arity(1, 1)?;
                Operation::Merge {
                    range: args[0].to_string(),
                }
            }
            "unmerge-row" => {
                arity(1, 1)?;
                Operation::UnmergeRow {
                    row: parse_index(args[0], "row")?,
                }
            }
            "smear-row" => {
                arity(1, 1)?;
                Operation::SmearRow {
                    row: parse_index(args[0], "row")?,
                }
            }
            "smear-column" => {
                arity(1, 1)?;
                Operation::SmearColumn {
                    column: parse_column(args[0])?,
                }
            }
            "combine-rows" => {
                arity(2, 3)?;
                Operation::CombineRows {
                    first: parse_index(args[0], "row")?,
                    second: parse_index(args[1], "row")?,
                    separator: args.get(2).map(|s| s.to_string()),
                }
            }
            "convert-column-to-percent" => {
                arity(1, 2)?;
                Operation::ConvertColumnToPercent {
                    column: parse_column(args[0])?,
                    skip: args.get(1).map(|t| parse_index(t, "row")).transpose()?,
                }
            }
            "normalize-names" => {
                arity(1, 1)?;
                Operation::NormalizeNames {
                    row: parse_index(args[0], "row")?,
                }
            }
            "reset-styling" => {
                arity(0, 0)?;
                Operation::ResetStyling
            }
            "remove-empty-rows" => {
                arity(0, 0)?;
                Operation::RemoveEmptyRows
            }
            "remove-empty-columns" => {
                arity(0, 0)?;
                Operation::RemoveEmptyColumns
            }
            "set-cell" => {
                if args.is_empty() {
                    return Err(invalid("set-cell takes a cell and a value"));
                }
                Operation::SetCell {
                    cell: args[0].to_string(),
                    value: args[1..].join(" "),
                }
            }
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };
        Ok(op)
    }

    /// Run the operation against one sheet. Returns a one-line summary.
    pub fn apply(&self, sheet: &mut Worksheet, defaults: &OperationDefaults) -> Result<String> {
        let summary = match self {
            Operation::DeleteRows { start, end } => {
                sheet.delete_rows(*start, *end)?;
                format!("deleted rows {}-{}", start, end)
            }
            Operation::DeleteColumns { start, end } => {
                sheet.delete_columns(*start, *end)?;
                format!("deleted columns {}-{}", start, end)
            }
            Operation::InsertRow { at } => {
                sheet.insert_row_at(*at)?;
                format!("inserted row {}", at)
            }
            Operation::InsertColumn { at } => {
                sheet.insert_column_at(*at)?;
                format!("inserted column {}", at)
            }
            Operation::MoveRow { from, to } => {
                sheet.move_row(*from, *to)?;
                format!("moved row {} to {}", from, to)
            }
            Operation::MoveColumn { from, to } => {
                sheet.move_column(*from, *to)?;
                format!("moved column {} to {}", from, to)
            }
            Operation::Merge { range } => {
                let parsed = MergeRange::from_str(range)
                    .ok_or_else(|| invalid(format!("invalid merge range '{}'", range)))?;
                sheet.merge_cells(parsed)?;
                format!("merged {}", parsed)
            }
            Operation::UnmergeRow { row } => {
                let ranges = sheet.unmerge_row(*row)?;
                format!("unmerged {} range(s) in row {}", ranges.len(), row)
            }
            Operation::SmearRow { row } => {
                let filled = sheet.smear_row(*row)?;
                format!("filled {} cell(s) in row {}", filled, row)
            }
            Operation::SmearColumn { column } => {
                let filled = sheet.smear_column(*column)?;
                format!("filled {} cell(s) in column {}", filled, column)
            }
            Operation::CombineRows {
                first,
                second,
                separator,
            } => {
                let separator = separator.as_deref().unwrap_or(&defaults.combine_separator);
                sheet.combine_rows(*first, *second, separator)?;
                format!("combined row {} into row {}", first, second)
            }
            Operation::ConvertColumnToPercent { column, skip } => {
                let converted =
                    sheet.convert_column_to_percent(*column, skip.unwrap_or(defaults.percent_skip))?;
                format!("converted {} cell(s) in column {}", converted, column)
            }
            Operation::NormalizeNames { row } => {
                sheet.apply_name_normalization(*row)?;
                format!("normalized names in row {}", row)
            }
            Operation::ResetStyling => {
                let count = sheet.reset_styling();
                format!("reset styling on {} cell(s)", count)
            }
            Operation::RemoveEmptyRows => {
                let removed = sheet.remove_empty_rows()?;
                format!("removed {} empty row(s)", removed.len())
            }
            Operation::RemoveEmptyColumns => {
                let removed = sheet.remove_empty_columns()?;
                format!("removed {} empty column(s)", removed.len())
            }
            Operation::SetCell { cell, value } => {
                let cell_ref = CellRef::from_str(cell)
                    .ok_or_else(|| invalid(format!("invalid cell reference '{}'", cell)))?;
                sheet.set_value(cell_ref.row, cell_ref.col, CellValue::parse(value))?;
                format!("set {}", cell_ref)
            }
        };
        tracing::info!(sheet = %sheet.name, "{}", summary);
        Ok(summary)
    }
}

/// One recipe step: an operation plus an optional target sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(flatten)]
    pub operation: Operation,
}

/// An ordered list of steps loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Sheet used by steps that do not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn from_toml_str(content: &str) -> Result<Recipe> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Recipe> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_RECIPE_BYTES {
            return Err(ExgridError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: recipe too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_RECIPE_BYTES
                ),
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl Workbook {
    /// Name of the sheet an operation should run against: the requested one
    /// if given, otherwise the first sheet.
    pub fn resolve_sheet(&self, requested: Option<&str>) -> Result<String> {
        match requested {
            Some(name) => self.sheet(name).map(|s| s.name.clone()),
            None => self
                .sheets
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| ExgridError::SheetNotFound("(workbook has no sheets)".to_string())),
        }
    }

    pub fn apply_operation(
        &mut self,
        sheet: Option<&str>,
        operation: &Operation,
        defaults: &OperationDefaults,
    ) -> Result<String> {
        let name = self.resolve_sheet(sheet)?;
        operation.apply(self.sheet_mut(&name)?, defaults)
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// A step's sheet wins over the recipe's, which wins over `default_sheet`.
    pub fn apply_recipe(
        &mut self,
        recipe: &Recipe,
        default_sheet: Option<&str>,
        defaults: &OperationDefaults,
    ) -> Result<Vec<String>> {
        let mut summaries = Vec::with_capacity(recipe.steps.len());
        for step in &recipe.steps {
            let target = step
                .sheet
                .as_deref()
                .or(recipe.sheet.as_deref())
                .or(default_sheet);
            summaries.push(self.apply_operation(target, &step.operation, defaults)?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    #[test]
    fn test_parse_command_forms() {
        assert_eq!(
            Operation::parse_command("delete-rows 2 3").unwrap(),
            Operation::DeleteRows { start: 2, end: 3 }
        );
        assert_eq!(
            Operation::parse_command("delete-columns C").unwrap(),
            Operation::DeleteColumns { start: 3, end: 3 }
        );
        assert_eq!(
            Operation::parse_command("  smear-column  AA ").unwrap(),
            Operation::SmearColumn { column: 27 }
        );
        assert_eq!(
            Operation::parse_command("combine-rows 1 2").unwrap(),
            Operation::CombineRows {
                first: 1,
                second: 2,
                separator: None
            }
        );
        assert_eq!(
            Operation::parse_command("set-cell B3 Net sales").unwrap(),
            Operation::SetCell {
                cell: "B3".to_string(),
                value: "Net sales".to_string()
            }
        );
        assert_eq!(
            Operation::parse_command("remove-empty-rows").unwrap(),
            Operation::RemoveEmptyRows
        );
    }

    #[test]
    fn test_parse_command_errors() {
        for input in [
            "",
            "explode 1",
            "delete-rows",
            "delete-rows x",
            "move-row 1",
            "reset-styling now",
            "smear-column 1B",
        ] {
            assert!(
                matches!(
                    Operation::parse_command(input),
                    Err(ExgridError::InvalidCommand(_))
                ),
                "expected InvalidCommand for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_recipe_from_toml() {
        let recipe = Recipe::from_toml_str(
            r#"
sheet = "Data"

[[step]]
op = "unmerge-row"
row = 2

[[step]]
op = "convert-column-to-percent"
column = 3
sheet = "Rates"

[[step]]
op = "reset-styling"
"#,
        )
        .unwrap();

        assert_eq!(recipe.sheet.as_deref(), Some("Data"));
        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(recipe.steps[0].operation, Operation::UnmergeRow { row: 2 });
        assert_eq!(recipe.steps[1].sheet.as_deref(), Some("Rates"));
        assert_eq!(
            recipe.steps[1].operation,
            Operation::ConvertColumnToPercent {
                column: 3,
                skip: None
            }
        );
        assert_eq!(recipe.steps[2].operation, Operation::ResetStyling);
    }

    #[test]
    fn test_recipe_rejects_unknown_op() {
        let result = Recipe::from_toml_str("[[step]]\nop = \"explode\"\n");
        assert!(matches!(result, Err(ExgridError::Recipe(_))));
    }

    #[test]
    fn test_apply_recipe_resolves_sheets() {
        let mut book = Workbook::with_sheet("First");
        book.add_sheet("Second").unwrap();
        book.set_cell_value("First", 1, 1, text("a")).unwrap();
        book.set_cell_value("Second", 1, 1, text("b")).unwrap();

        let recipe = Recipe {
            sheet: None,
            steps: vec![
                Step {
                    sheet: None,
                    operation: Operation::InsertRow { at: 1 },
                },
                Step {
                    sheet: Some("First".to_string()),
                    operation: Operation::InsertColumn { at: 1 },
                },
            ],
        };
        let summaries = book
            .apply_recipe(&recipe, Some("Second"), &OperationDefaults::default())
            .unwrap();
        assert_eq!(summaries, vec!["inserted row 1", "inserted column 1"]);
        assert_eq!(book.sheet("Second").unwrap().value(2, 1), text("b"));
        assert_eq!(book.sheet("First").unwrap().value(1, 2), text("a"));
    }

    #[test]
    fn test_apply_uses_defaults() {
        let mut book = Workbook::with_sheet("Sheet1");
        for (row, values) in [(1, ["a", "b"]), (2, ["c", "d"])] {
            for (idx, value) in values.iter().enumerate() {
                book.set_cell_value("Sheet1", row, idx + 1, text(value))
                    .unwrap();
            }
        }
        let defaults = OperationDefaults {
            combine_separator: "/".to_string(),
            percent_skip: 1,
        };
        book.apply_operation(
            None,
            &Operation::parse_command("combine-rows 1 2").unwrap(),
            &defaults,
        )
        .unwrap();
        assert_eq!(
            book.sheet("Sheet1").unwrap().row_values(1),
            vec![text("a/c"), text("b/d")]
        );
    }

    #[test]
    fn test_apply_to_missing_sheet() {
        let mut book = Workbook::with_sheet("Sheet1");
        let result = book.apply_operation(
            Some("Nope"),
            &Operation::ResetStyling,
            &OperationDefaults::default(),
        );
        assert!(matches!(result, Err(ExgridError::SheetNotFound(_))));
    }

    #[test]
    fn test_set_cell_parses_value() {
        let mut sheet = Worksheet::new("Sheet1");
        Operation::parse_command("set-cell C2 0.5")
            .unwrap()
            .apply(&mut sheet, &OperationDefaults::default())
            .unwrap();
        assert_eq!(sheet.value(2, 3), Some(CellValue::Float(0.5)));

        let bad = Operation::parse_command("set-cell 2C 1")
            .unwrap()
            .apply(&mut sheet, &OperationDefaults::default());
        assert!(matches!(bad, Err(ExgridError::InvalidCommand(_))));
    }
}
