//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style labels
//! (e.g., "A1", "B2", "AA100") and zero-indexed row/column coordinates.
//! Column letters use bijective base-26: there is no zero digit, so
//! `A` = 1 ... `Z` = 26, `AA` = 27.
//!
//! # Examples
//!
//! ```
//! use sheetcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

fn label_re() -> &'static Regex {
    static LABEL_RE: OnceLock<Regex> = OnceLock::new();
    LABEL_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").expect("cell label regex must compile")
    })
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a label such as "A1" or "AA10".
    ///
    /// Only upper-case letters are accepted. Returns `None` when the label does
    /// not match, when the row is `0`, or when either coordinate overflows.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(label: &str) -> Option<CellRef> {
        let (row_number, col) = Self::split_label(label)?;
        Some(CellRef::new(row_number.checked_sub(1)?, col))
    }

    /// Split a label into its 1-based row number and 0-based column.
    ///
    /// Unlike [`CellRef::from_str`] this keeps row `0`, which names the row
    /// just above the grid.
    pub fn split_label(label: &str) -> Option<(usize, usize)> {
        let caps = label_re().captures(label)?;
        let col = Self::letters_to_col(&caps["letters"])?;
        let row_number = caps["numbers"].parse::<usize>().ok()?;
        Some((row_number, col))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Inverse of [`CellRef::col_to_letters`]. Rejects empty input, anything
    /// outside `A-Z`, and values that do not fit in `usize`.
    pub fn letters_to_col(letters: &str) -> Option<usize> {
        if letters.is_empty() {
            return None;
        }
        // `usize::MAX` encodes as 2^64, one past what `usize` holds.
        let mut acc = 0u128;
        for b in letters.bytes() {
            if !b.is_ascii_uppercase() {
                return None;
            }
            let digit = (b - b'A') as u128 + 1;
            acc = acc.checked_mul(26)?.checked_add(digit)?;
        }
        usize::try_from(acc.checked_sub(1)?).ok()
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(CellRef::letters_to_col(&letters), Some(usize::MAX));
    }

    #[test]
    fn test_round_trip_near_usize_max() {
        for col in [usize::MAX - 1, usize::MAX / 26, usize::MAX / 2 + 1] {
            let letters = CellRef::col_to_letters(col);
            assert_eq!(CellRef::letters_to_col(&letters), Some(col), "{}", letters);
        }
        let one_past = format!("{}A", CellRef::col_to_letters(usize::MAX));
        assert_eq!(CellRef::letters_to_col(&one_past), None);
    }

    #[test]
    fn test_split_label_keeps_row_zero() {
        assert_eq!(CellRef::split_label("A0"), Some((0, 0)));
        assert_eq!(CellRef::split_label("AB12"), Some((12, 27)));
        assert_eq!(CellRef::split_label("a1"), None);
        assert_eq!(CellRef::from_str("A0"), None);
    }

    #[test]
    fn test_col_to_letters_is_bijective() {
        assert_eq!(CellRef::col_to_letters(0), "A");
        assert_eq!(CellRef::col_to_letters(25), "Z");
        assert_eq!(CellRef::col_to_letters(26), "AA");
        assert_eq!(CellRef::col_to_letters(51), "AZ");
        assert_eq!(CellRef::col_to_letters(52), "BA");
        assert_eq!(CellRef::col_to_letters(701), "ZZ");
        assert_eq!(CellRef::col_to_letters(702), "AAA");
    }

    #[test]
    fn test_column_label_round_trip() {
        for col in 0..20_000 {
            let letters = CellRef::col_to_letters(col);
            assert_eq!(CellRef::letters_to_col(&letters), Some(col), "{}", letters);
        }
    }

    #[test]
    fn test_letters_to_col_rejects_non_letters() {
        assert_eq!(CellRef::letters_to_col(""), None);
        assert_eq!(CellRef::letters_to_col("a"), None);
        assert_eq!(CellRef::letters_to_col("A1"), None);
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(CellRef::new(9, 26).to_string(), "AA10");
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
    }
}
