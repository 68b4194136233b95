//! Error types for formula parsing.

use thiserror::Error;

/// Errors raised while turning expression text into a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaParseError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Malformed number '{text}' at offset {offset}")]
    BadNumber { text: String, offset: usize },

    #[error("Unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Empty expression")]
    Empty,
}

pub type Result<T> = std::result::Result<T, FormulaParseError>;
