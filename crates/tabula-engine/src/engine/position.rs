//! Cell position parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style addresses
//! (e.g., "A1", "B12", "AA100") and zero-indexed row/column coordinates.
//!
//! # Examples
//!
//! ```
//! use tabula_engine::Position;
//!
//! let pos = Position::from_text("B3");
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_text(), "B3");
//! assert_eq!(Position::from_text("b3"), Position::NONE);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const LETTERS: i32 = 26;
const MAX_POSITION_LENGTH: usize = 17;
const MAX_POS_LETTER_COUNT: usize = 3;
const MAX_POS_DIGIT_COUNT: usize = 5;

/// A zero-based (row, column) coordinate.
///
/// Field order gives the derived `Ord` its row-major ordering.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const MAX_ROWS: i32 = 16_384;
    pub const MAX_COLS: i32 = 16_384;

    /// Sentinel for "no position".
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        (0..Self::MAX_ROWS).contains(&self.row) && (0..Self::MAX_COLS).contains(&self.col)
    }

    /// Format as an address ("A1"). Invalid positions format as an empty string.
    pub fn to_text(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        format!("{}{}", Self::col_to_letters(self.col), self.row + 1)
    }

    /// Parse an address. Returns [`Position::NONE`] if the text is malformed
    /// or decodes to an out-of-bounds coordinate.
    pub fn from_text(text: &str) -> Position {
        Self::parse_a1(text).unwrap_or(Position::NONE)
    }

    fn parse_a1(text: &str) -> Option<Position> {
        if text.len() > MAX_POSITION_LENGTH {
            return None;
        }
        let caps = address_re().captures(text)?;
        let letters = &caps["letters"];
        let digits = &caps["digits"];
        if letters.len() > MAX_POS_LETTER_COUNT || digits.len() > MAX_POS_DIGIT_COUNT {
            return None;
        }

        let col = Self::letters_to_col(letters)?;
        let row = digits.parse::<i32>().ok()? - 1;

        let pos = Position::new(row, col);
        pos.is_valid().then_some(pos)
    }

    /// Decode a bijective base-26 column ("A" -> 0, "Z" -> 25, "AA" -> 26).
    fn letters_to_col(letters: &str) -> Option<i32> {
        let mut acc = 0i32;
        for c in letters.bytes() {
            let digit = (c - b'A') as i32 + 1;
            acc = acc.checked_mul(LETTERS)?.checked_add(digit)?;
        }
        acc.checked_sub(1)
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: i32) -> String {
        let mut result = String::new();
        let mut n = col as i64 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % LETTERS as i64) as u8) as char);
            n /= LETTERS as i64;
        }
        result
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::NONE
    }
}

fn address_re() -> &'static Regex {
    static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<digits>[0-9]+)$")
            .expect("position address regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell position: {}", s))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use proptest::prelude::*;

    #[test]
    fn test_letter_and_digit_limits() {
        assert_eq!(Position::from_text("ABCD1"), Position::NONE);
        assert_eq!(Position::from_text("A123456"), Position::NONE);
        assert_eq!(Position::from_text("A12345"), Position::new(12_344, 0));
    }

    #[test]
    fn test_overlong_text_is_rejected() {
        let long = format!("A{}", "0".repeat(20));
        assert_eq!(Position::from_text(&long), Position::NONE);
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        // XFD is column 16383, the last valid one.
        assert_eq!(Position::from_text("XFD16384"), Position::new(16_383, 16_383));
        assert_eq!(Position::from_text("XFE1"), Position::NONE);
        assert_eq!(Position::from_text("A16385"), Position::NONE);
    }

    #[test]
    fn test_invalid_position_formats_empty() {
        assert_eq!(Position::NONE.to_text(), "");
        assert_eq!(Position::new(0, Position::MAX_COLS).to_text(), "");
        assert_eq!(Position::new(-5, 0).to_string(), "");
    }

    #[test]
    fn test_row_major_order() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }

    #[test]
    fn test_from_str_reports_input() {
        let err = "1A".parse::<Position>().unwrap_err();
        assert!(err.contains("1A"));
    }

    proptest! {
        #[test]
        fn test_text_round_trip(row in 0..Position::MAX_ROWS, col in 0..Position::MAX_COLS) {
            let pos = Position::new(row, col);
            prop_assert_eq!(Position::from_text(&pos.to_text()), pos);
        }
    }
}
