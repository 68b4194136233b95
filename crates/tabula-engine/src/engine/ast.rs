//! Arithmetic expression tree.
//!
//! Evaluation produces either a number or a [`FormulaError`]; printing
//! produces the canonical expression text with only the parentheses the
//! operator precedence requires.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::format::format_literal;
use super::formula::CellLookup;
use super::position::Position;
use super::value::{FormulaError, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Cell(Position),
    /// A reference token that does not name a position inside the sheet.
    BadRef(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Precedence classes used when deciding where parentheses are needed.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Additive,
    Multiplicative,
    Unary,
    Atom,
}

impl Expr {
    fn class(&self) -> Class {
        match self {
            Expr::Binary {
                op: BinaryOp::Add | BinaryOp::Sub,
                ..
            } => Class::Additive,
            Expr::Binary { .. } => Class::Multiplicative,
            Expr::Unary { .. } => Class::Unary,
            _ => Class::Atom,
        }
    }

    /// Evaluate against `lookup`. The first error encountered, left to right, wins.
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> Result<f64, FormulaError> {
        let n = match self {
            Expr::Number(n) => *n,
            Expr::Cell(pos) => operand_value(lookup.lookup(*pos))?,
            Expr::BadRef(_) => return Err(FormulaError::Ref),
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(lookup)?;
                match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                }
            }
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(lookup)?;
                let r = right.evaluate(lookup)?;
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => {
                        if r == 0.0 {
                            return Err(FormulaError::Div0);
                        }
                        l / r
                    }
                }
            }
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(FormulaError::Div0)
        }
    }

    /// Push every valid referenced position, in expression order.
    pub(crate) fn collect_cells(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Cell(pos) => out.push(*pos),
            Expr::Number(_) | Expr::BadRef(_) => {}
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { left, right, .. } => {
                left.collect_cells(out);
                right.collect_cells(out);
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_literal(*n)),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::BadRef(text) => f.write_str(text),
            Expr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.fmt_operand(f, operand.class() == Class::Additive)
            }
            Expr::Binary { op, left, right } => {
                let (left_parens, right_parens) = match op {
                    BinaryOp::Add => (false, false),
                    BinaryOp::Sub => (false, right.class() == Class::Additive),
                    BinaryOp::Mul => (
                        left.class() == Class::Additive,
                        right.class() == Class::Additive,
                    ),
                    BinaryOp::Div => (
                        left.class() == Class::Additive,
                        matches!(right.class(), Class::Additive | Class::Multiplicative),
                    ),
                };
                left.fmt_operand(f, left_parens)?;
                write!(f, "{}", op.symbol())?;
                right.fmt_operand(f, right_parens)
            }
        }
    }
}

/// Interpret a referenced cell's value as a numeric operand.
fn operand_value(value: Option<Value>) -> Result<f64, FormulaError> {
    match value {
        None => Ok(0.0),
        Some(Value::Number(n)) => Ok(n),
        Some(Value::Error(e)) => Err(e),
        Some(Value::Text(text)) => {
            if text.is_empty() {
                Ok(0.0)
            } else if number_re().is_match(&text) {
                text.parse::<f64>().map_err(|_| FormulaError::Value)
            } else {
                Err(FormulaError::Value)
            }
        }
    }
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("numeric text regex must compile")
    })
}
