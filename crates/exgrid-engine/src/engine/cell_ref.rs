//! Cell reference parsing and column-letter mapping.
//!
//! Provides bidirectional conversion between spreadsheet-style cell references
//! (e.g., "A1", "B2", "AA100") and 1-based row/column coordinates, plus the
//! bijective base-26 column-letter mapping the references are built on.
//!
//! # Examples
//!
//! ```
//! use exgrid_engine::engine::{CellRef, column_letter, column_number};
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//!
//! assert_eq!(column_letter(28).as_deref(), Some("AB"));
//! assert_eq!(column_number("ab"), Some(28));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convert a 1-based column number to its letters (1 -> A, 26 -> Z, 27 -> AA).
/// Returns None for column 0, which has no letter form.
pub fn column_letter(col: usize) -> Option<String> {
    if col == 0 {
        return None;
    }
    let mut result = Vec::new();
    let mut n = col as u128;
    while n > 0 {
        n -= 1;
        result.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    result.reverse();
    String::from_utf8(result).ok()
}

/// Convert column letters back to a 1-based column number (case-insensitive).
/// Returns None for empty input, non-letters or overflow.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc)
}

/// A reference to a cell by 1-based row and column.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "B2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let split = name.find(|c: char| c.is_ascii_digit())?;
        let (letters, numbers) = name.split_at(split);
        if !numbers.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let col = column_number(letters)?;
        let row = numbers.parse::<usize>().ok()?;
        if row == 0 {
            return None;
        }
        Some(CellRef::new(row, col))
    }

    /// Column letters of this reference ("" for the invalid column 0).
    pub fn col_letters(&self) -> String {
        column_letter(self.col).unwrap_or_default()
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col_letters(), self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRef, column_letter, column_number};

    #[test]
    fn test_column_letter_boundaries() {
        assert_eq!(column_letter(0), None);
        assert_eq!(column_letter(1).as_deref(), Some("A"));
        assert_eq!(column_letter(26).as_deref(), Some("Z"));
        assert_eq!(column_letter(27).as_deref(), Some("AA"));
        assert_eq!(column_letter(52).as_deref(), Some("AZ"));
        assert_eq!(column_letter(53).as_deref(), Some("BA"));
        assert_eq!(column_letter(702).as_deref(), Some("ZZ"));
        assert_eq!(column_letter(703).as_deref(), Some("AAA"));
    }

    #[test]
    fn test_column_number_rejects_garbage() {
        assert_eq!(column_number(""), None);
        assert_eq!(column_number("A1"), None);
        assert_eq!(column_number("A-"), None);
        assert_eq!(column_number(&"Z".repeat(40)), None);
    }

    #[test]
    fn test_letter_number_round_trip() {
        for n in 1..=20_000 {
            let letters = column_letter(n).unwrap();
            assert_eq!(column_number(&letters), Some(n), "column {}", n);
        }
        for s in ["A", "Q", "Z", "AA", "AZ", "BA", "ZZ", "AAA", "XFD"] {
            let n = column_number(s).unwrap();
            assert_eq!(column_letter(n).as_deref(), Some(s));
        }
    }

    #[test]
    fn test_column_letter_handles_max_usize() {
        let letters = column_letter(usize::MAX).unwrap();
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_display_round_trip() {
        let cell = CellRef::new(100, 27);
        assert_eq!(cell.to_string(), "AA100");
        assert_eq!(CellRef::from_str("AA100"), Some(cell));
    }
}
