//! Dependency graph maintenance.
//!
//! Edges live on the cells as position sets: a formula cell lists the cells
//! it reads in `parents`, and each of those lists it back in `children`.
//! Before a formula is committed we verify that none of the cells it reads
//! can reach it through existing edges; after any change we drop cached
//! results of everything downstream.

use log::trace;
use std::collections::HashSet;

use tabula_engine::Position;

use super::storage::Sheet;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Fail if making `root` read `references` would close a cycle.
    ///
    /// Walks upward from each reference through existing parent edges.
    /// Absent cells have no edges and end the walk.
    pub(crate) fn check_cycles(&self, root: Position, references: &[Position]) -> Result<()> {
        let mut visited = HashSet::new();
        if self.reaches(root, references.iter().copied(), &mut visited) {
            return Err(SheetError::CircularDependency(root));
        }
        Ok(())
    }

    fn reaches(
        &self,
        root: Position,
        frontier: impl Iterator<Item = Position>,
        visited: &mut HashSet<Position>,
    ) -> bool {
        for pos in frontier {
            if pos == root {
                return true;
            }
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cell(pos) else {
                continue;
            };
            if self.reaches(root, cell.parents(), visited) {
                return true;
            }
        }
        false
    }

    /// Remove every parent edge of the cell at `pos`, on both ends.
    pub(crate) fn detach_parents(&mut self, pos: Position) {
        let parents = match self.cell_mut(pos) {
            Some(cell) => std::mem::take(&mut cell.parents),
            None => return,
        };
        for parent in parents {
            if let Some(cell) = self.cell_mut(parent) {
                cell.children.remove(&pos);
            }
        }
    }

    /// Link the cell at `pos` to each of `parents`, creating empty cells
    /// for parents that are not stored yet.
    pub(crate) fn attach_parents(&mut self, pos: Position, parents: &[Position]) {
        for &parent in parents {
            self.ensure_cell(parent).children.insert(pos);
        }
        if let Some(cell) = self.cell_mut(pos) {
            cell.parents.extend(parents.iter().copied());
        }
    }

    /// Drop the cached result of `start` and of every cell that depends on
    /// it, directly or transitively.
    pub(crate) fn invalidate(&self, start: Position) {
        let mut to_process = vec![start];
        let mut visited = HashSet::new();
        while let Some(pos) = to_process.pop() {
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cell(pos) else {
                continue;
            };
            if cell.content.clear_cache() {
                trace!("invalidated cached value of {}", pos);
            }
            to_process.extend(cell.children());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_engine::Value;

    fn pos(text: &str) -> Position {
        Position::from_text(text)
    }

    fn is_cached(sheet: &Sheet, text: &str) -> bool {
        sheet.cell(pos(text)).is_some_and(|cell| cell.content.is_cached())
    }

    #[test]
    fn test_edges_are_symmetric() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("C1"), "=A1+B1").unwrap();

        let c1 = sheet.cell(pos("C1")).unwrap();
        assert_eq!(c1.parents().collect::<Vec<_>>(), vec![pos("A1"), pos("B1")]);
        for parent in ["A1", "B1"] {
            let cell = sheet.cell(pos(parent)).unwrap();
            assert_eq!(cell.children().collect::<Vec<_>>(), vec![pos("C1")]);
        }
    }

    #[test]
    fn test_rewiring_drops_old_edges() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("C1"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1").unwrap();

        assert!(!sheet.cell(pos("A1")).unwrap().is_referenced());
        assert!(sheet.cell(pos("B1")).unwrap().is_referenced());
        assert_eq!(
            sheet.cell(pos("C1")).unwrap().parents().collect::<Vec<_>>(),
            vec![pos("B1")]
        );
    }

    #[test]
    fn test_cycle_detection_paths() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1").unwrap();
        sheet.set_cell(pos("B1"), "=C1").unwrap();

        assert!(sheet.check_cycles(pos("C1"), &[pos("A1")]).is_err());
        assert!(sheet.check_cycles(pos("C1"), &[pos("C1")]).is_err());
        assert!(sheet.check_cycles(pos("D1"), &[pos("A1")]).is_ok());
        assert!(sheet.check_cycles(pos("C1"), &[]).is_ok());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("B2"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1+B2").unwrap();
        assert_eq!(sheet.cell_value(pos("C1")).unwrap(), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_invalidate_reaches_transitive_children() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("A2"), "=A1+1").unwrap();
        sheet.set_cell(pos("A3"), "=A2+1").unwrap();
        sheet.set_cell(pos("B3"), "=5").unwrap();

        sheet.cell_value(pos("A3")).unwrap();
        sheet.cell_value(pos("B3")).unwrap();
        assert!(is_cached(&sheet, "A2"));
        assert!(is_cached(&sheet, "A3"));

        sheet.invalidate(pos("A1"));
        assert!(!is_cached(&sheet, "A2"));
        assert!(!is_cached(&sheet, "A3"));
        assert!(is_cached(&sheet, "B3"));
    }

    #[test]
    fn test_detach_on_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.detach_parents(pos("A1"));
        assert!(sheet.is_empty());
    }
}
