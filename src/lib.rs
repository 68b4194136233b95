//! tabula - In-memory spreadsheet evaluation core.
//!
//! Cells hold empty content, literal text or a formula. Formulas are
//! tracked in a dependency graph that rejects cycles before they are
//! committed and drops cached results downstream of every change.
//!
//! ```
//! use tabula::{Position, Sheet, Value};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell(Position::from_text("A1"), "5")?;
//! sheet.set_cell(Position::from_text("A2"), "=A1*2")?;
//! assert_eq!(sheet.cell_value(Position::from_text("A2"))?, Some(Value::Number(10.0)));
//! # Ok::<(), tabula::SheetError>(())
//! ```

pub use tabula_core::{
    Cell, CellContent, CellView, Limits, Result, Sheet, SheetConfig, SheetError, Size, config,
    error, sheet,
};
pub use tabula_engine::{
    ArithmeticFormula, ArithmeticParser, CellLookup, Formula, FormulaError, FormulaParseError,
    FormulaParser, Position, Value, engine,
};
