//! The formula contract consumed by the sheet.
//!
//! A sheet only needs three things from a formula: evaluate it against a
//! cell lookup, list the positions it reads, and print it back as
//! canonical text. [`FormulaParser`] turns expression text into such an
//! object; [`ArithmeticParser`] is the built-in implementation.

use std::fmt;

use super::ast::Expr;
use super::parser::parse_expression;
use super::position::Position;
use super::value::Value;
use crate::error::Result;

/// Read access to computed cell values during evaluation.
pub trait CellLookup {
    /// Value of the cell stored at `pos`, or `None` if no cell exists there.
    fn lookup(&self, pos: Position) -> Option<Value>;
}

/// An evaluable formula expression.
pub trait Formula: fmt::Debug {
    /// Evaluate against `lookup`. Expected failures come back as
    /// [`Value::Error`], never as a panic.
    fn evaluate(&self, lookup: &dyn CellLookup) -> Value;

    /// Positions read by this formula.
    fn referenced_cells(&self) -> Vec<Position>;

    /// Canonical expression text, without the leading formula sign.
    fn expression(&self) -> String;
}

/// Builds formulas from expression text (without the leading formula sign).
pub trait FormulaParser: fmt::Debug {
    fn parse(&self, expression: &str) -> Result<Box<dyn Formula>>;
}

/// Arithmetic formula over numbers and cell references.
#[derive(Debug, Clone)]
pub struct ArithmeticFormula {
    expr: Expr,
    referenced: Vec<Position>,
}

impl ArithmeticFormula {
    pub fn parse(expression: &str) -> Result<ArithmeticFormula> {
        let expr = parse_expression(expression)?;
        let referenced = extract_dependencies(&expr);
        Ok(ArithmeticFormula { expr, referenced })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl Formula for ArithmeticFormula {
    fn evaluate(&self, lookup: &dyn CellLookup) -> Value {
        match self.expr.evaluate(lookup) {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }

    fn referenced_cells(&self) -> Vec<Position> {
        self.referenced.clone()
    }

    fn expression(&self) -> String {
        self.expr.to_string()
    }
}

/// The default [`FormulaParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticParser;

impl FormulaParser for ArithmeticParser {
    fn parse(&self, expression: &str) -> Result<Box<dyn Formula>> {
        Ok(Box::new(ArithmeticFormula::parse(expression)?))
    }
}

/// Collect the valid positions an expression reads, sorted and deduplicated.
pub fn extract_dependencies(expr: &Expr) -> Vec<Position> {
    let mut deps = Vec::new();
    expr.collect_cells(&mut deps);
    deps.sort();
    deps.dedup();
    deps
}
