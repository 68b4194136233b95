//! Error types for Tabula core.

use thiserror::Error;

use tabula_engine::{FormulaParseError, Position};

/// Structural failures of sheet operations.
///
/// Evaluation problems (`#REF!`, `#VALUE!`, `#DIV/0!`) are not errors here;
/// they are values returned by the cell.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid position (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),

    #[error("Formula syntax error: {0}")]
    FormulaSyntax(#[from] FormulaParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
