//! Cell data structures for the sheet.
//!
//! - [`CellContent`] - The payload of a cell (empty, literal text, or formula)
//! - [`Cell`] - A payload plus its edges in the dependency graph
//! - [`CellView`] - A borrowed handle pairing a cell with its sheet

use std::cell::RefCell;
use std::collections::BTreeSet;

use tabula_engine::{CellLookup, Formula, FormulaParser, Position, Value};

use crate::error::Result;

/// Leading character marking a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character marking literal text that would otherwise be a formula.
pub const ESCAPE_SIGN: char = '\'';

/// The content stored in a cell.
#[derive(Debug)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula {
        formula: Box<dyn Formula>,
        /// Result of the last evaluation; `None` until first read or after
        /// an ancestor changed.
        cache: RefCell<Option<Value>>,
    },
}

impl CellContent {
    /// Classify raw input:
    /// - Empty string -> Empty
    /// - Formula sign followed by at least one character -> Formula
    /// - Anything else -> Text
    pub fn from_input(text: &str, parser: &dyn FormulaParser) -> Result<CellContent> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => Ok(CellContent::Formula {
                formula: parser.parse(expression)?,
                cache: RefCell::new(None),
            }),
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }

    /// The literal text, with formula sign or escape marker preserved.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula { formula, .. } => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    /// Sorted, deduplicated positions read by a formula; empty otherwise.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellContent::Formula { formula, .. } => {
                let mut cells = formula.referenced_cells();
                cells.sort();
                cells.dedup();
                cells
            }
            CellContent::Empty | CellContent::Text(_) => Vec::new(),
        }
    }

    pub fn value(&self, lookup: &dyn CellLookup) -> Value {
        match self {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                Value::Text(text.strip_prefix(ESCAPE_SIGN).unwrap_or(text).to_string())
            }
            CellContent::Formula { formula, cache } => {
                let cached = cache.borrow().clone();
                if let Some(value) = cached {
                    return value;
                }
                let value = formula.evaluate(lookup);
                *cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// Drop the cached formula result. Returns whether anything was cached.
    pub fn clear_cache(&self) -> bool {
        match self {
            CellContent::Formula { cache, .. } => cache.borrow_mut().take().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }

    pub fn is_cached(&self) -> bool {
        match self {
            CellContent::Formula { cache, .. } => cache.borrow().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }
}

/// A cell in the sheet.
///
/// `parents` and `children` hold positions, not cells: the sheet alone owns
/// cell storage.
#[derive(Debug)]
pub struct Cell {
    pub(crate) content: CellContent,
    /// Cells this cell's formula reads.
    pub(crate) parents: BTreeSet<Position>,
    /// Cells whose formulas read this cell.
    pub(crate) children: BTreeSet<Position>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: CellContent::Empty,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells()
    }

    pub fn value(&self, lookup: &dyn CellLookup) -> Value {
        self.content.value(lookup)
    }

    /// True if some formula reads this cell.
    pub fn is_referenced(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    pub fn parents(&self) -> impl Iterator<Item = Position> + '_ {
        self.parents.iter().copied()
    }

    pub fn children(&self) -> impl Iterator<Item = Position> + '_ {
        self.children.iter().copied()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}

/// A cell borrowed from its sheet, able to evaluate itself.
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    pub(crate) position: Position,
    pub(crate) cell: &'a Cell,
    pub(crate) lookup: &'a dyn CellLookup,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn cell(&self) -> &'a Cell {
        self.cell
    }

    /// Computed value; formulas are evaluated and cached on first read.
    pub fn value(&self) -> Value {
        self.cell.value(self.lookup)
    }

    pub fn text(&self) -> String {
        self.cell.text()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_empty()
    }

    /// Positions of the cells whose formulas read this one.
    pub fn dependents(&self) -> Vec<Position> {
        self.cell.children().collect()
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("position", &self.position)
            .field("text", &self.cell.text())
            .finish()
    }
}
