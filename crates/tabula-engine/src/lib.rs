//! tabula_engine - Cell addressing, values and formula evaluation.

pub mod engine;
pub mod error;

pub use engine::{
    ArithmeticFormula, ArithmeticParser, CellLookup, Formula, FormulaError, FormulaParser,
    Position, Value,
};
pub use error::FormulaParseError;
