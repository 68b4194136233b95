//! Spreadsheet engine API.
//!
//! This module provides the leaf building blocks of a sheet:
//!
//! - [`Position`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`Value`], [`FormulaError`] - Computed cell values and error categories
//! - [`Formula`], [`FormulaParser`], [`CellLookup`] - The formula contract
//! - [`ArithmeticParser`] - Built-in arithmetic formulas
//! - [`format_number`] - Format values for display

mod ast;
mod format;
mod formula;
mod parser;
mod position;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use format::{format_literal, format_number};
pub use formula::{
    ArithmeticFormula, ArithmeticParser, CellLookup, Formula, FormulaParser, extract_dependencies,
};
pub use parser::parse_expression;
pub use position::Position;
pub use value::{FormulaError, Value};
