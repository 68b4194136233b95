use log::debug;
use std::collections::BTreeMap;
use std::collections::btree_map;

use tabula_engine::{ArithmeticParser, CellLookup, FormulaError, FormulaParser, Position, Value};

use super::cell::{Cell, CellContent, CellView};
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};

/// Extent of the occupied region: one past the highest occupied row and
/// one past the highest occupied column in any row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

/// The cells of one row, keyed by column.
#[derive(Debug, Default)]
pub(crate) struct Row {
    cells: BTreeMap<i32, Cell>,
}

impl Row {
    fn get(&self, col: i32) -> Option<&Cell> {
        self.cells.get(&col)
    }

    fn get_mut(&mut self, col: i32) -> Option<&mut Cell> {
        self.cells.get_mut(&col)
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn last_col(&self) -> Option<i32> {
        self.cells.keys().next_back().copied()
    }

    pub(crate) fn iter(&self) -> btree_map::Iter<'_, i32, Cell> {
        self.cells.iter()
    }
}

/// Sparse sheet storage: row -> column -> cell.
///
/// The sheet is the sole owner of its cells. Dependency edges between cells
/// are position keys, so removing a cell is an index operation.
#[derive(Debug)]
pub struct Sheet {
    pub(crate) rows: BTreeMap<i32, Row>,
    parser: Box<dyn FormulaParser>,
    config: SheetConfig,
}

impl Sheet {
    /// Create an empty sheet using the built-in arithmetic formulas.
    pub fn new() -> Self {
        Self::with_parser(Box::new(ArithmeticParser))
    }

    pub fn with_parser(parser: Box<dyn FormulaParser>) -> Self {
        Self::with_parser_and_config(parser, SheetConfig::default())
    }

    /// Create an empty sheet limited by `config`.
    pub fn with_config(config: SheetConfig) -> Self {
        Self::with_parser_and_config(Box::new(ArithmeticParser), config)
    }

    /// Limits are fixed for the life of the sheet, so no stored cell can
    /// fall outside them.
    pub fn with_parser_and_config(parser: Box<dyn FormulaParser>, config: SheetConfig) -> Self {
        Sheet {
            rows: BTreeMap::new(),
            parser,
            config,
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn check_position(&self, pos: Position) -> Result<()> {
        if self.config.limits.contains(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    pub(crate) fn cell(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(&pos.row)?.get(pos.col)
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&pos.row)?.get_mut(pos.col)
    }

    /// Locate the cell at `pos`, creating an empty one if absent.
    pub(crate) fn ensure_cell(&mut self, pos: Position) -> &mut Cell {
        self.rows
            .entry(pos.row)
            .or_default()
            .cells
            .entry(pos.col)
            .or_insert_with(|| {
                debug!("created cell {}", pos);
                Cell::new_empty()
            })
    }

    /// Set the contents of the cell at `pos` from input text.
    ///
    /// Fails without touching the sheet if the position is invalid, the
    /// formula does not parse, or the formula would create a cycle.
    ///
    /// Only text equal to the cell's current canonical text is a no-op;
    /// an equivalent formula spelled differently (`=A1 + 1` for `=A1+1`)
    /// is re-committed and invalidates dependents.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;
        if let Some(cell) = self.cell(pos) {
            if cell.text() == text {
                return Ok(());
            }
        }

        let content = CellContent::from_input(text, self.parser.as_ref()).inspect_err(|err| {
            debug!("rejected {} = {:?}: {}", pos, text, err);
        })?;
        let parents = content.referenced_cells();
        if let Some(&outside) = parents.iter().find(|p| !self.config.limits.contains(**p)) {
            debug!("rejected {} = {:?}: reference outside sheet limits", pos, text);
            return Err(SheetError::InvalidPosition(outside));
        }
        self.check_cycles(pos, &parents).inspect_err(|_| {
            debug!("rejected {} = {:?}: circular dependency", pos, text);
        })?;

        self.ensure_cell(pos);
        self.detach_parents(pos);
        if let Some(cell) = self.cell_mut(pos) {
            cell.content = content;
        }
        self.attach_parents(pos, &parents);
        self.invalidate(pos);

        debug!("set {} = {:?}", pos, text);
        Ok(())
    }

    /// Get the cell at `pos`. `Ok(None)` means no cell is stored there.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.cell(pos).map(|cell| CellView {
            position: pos,
            cell,
            lookup: self,
        }))
    }

    pub fn cell_value(&self, pos: Position) -> Result<Option<Value>> {
        Ok(self.get_cell(pos)?.map(|view| view.value()))
    }

    pub fn cell_text(&self, pos: Position) -> Result<Option<String>> {
        Ok(self.get_cell(pos)?.map(|view| view.text()))
    }

    /// Clear the cell at `pos`. The cell stays in storage while other
    /// formulas still read it.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.check_position(pos)?;
        let Some(cell) = self.cell_mut(pos) else {
            return Ok(());
        };
        cell.content = CellContent::Empty;
        self.detach_parents(pos);
        self.invalidate(pos);

        let Some(row) = self.rows.get_mut(&pos.row) else {
            return Ok(());
        };
        if row.get(pos.col).is_some_and(|cell| !cell.is_referenced()) {
            row.cells.remove(&pos.col);
            debug!("removed cell {}", pos);
        }
        if row.is_empty() {
            self.rows.remove(&pos.row);
        }
        debug!("cleared {}", pos);
        Ok(())
    }

    pub fn printable_size(&self) -> Size {
        let rows = self.rows.keys().next_back().map_or(0, |row| row + 1);
        let cols = self
            .rows
            .values()
            .filter_map(Row::last_col)
            .max()
            .map_or(0, |col| col + 1);
        Size { rows, cols }
    }

    /// Number of stored cells, including empty cells kept alive by references.
    pub fn len(&self) -> usize {
        self.rows.values().map(|row| row.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All stored cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellView<'_>> + '_ {
        self.rows.iter().flat_map(move |(&row, cells)| {
            cells.iter().map(move |(&col, cell)| CellView {
                position: Position::new(row, col),
                cell,
                lookup: self,
            })
        })
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl CellLookup for Sheet {
    fn lookup(&self, pos: Position) -> Option<Value> {
        if !pos.is_valid() {
            return Some(Value::Error(FormulaError::Ref));
        }
        self.cell(pos).map(|cell| cell.value(self))
    }
}
