//! Sheet storage, cells and their dependency graph.

mod cell;
mod graph;
mod render;
mod storage;

pub use cell::{Cell, CellContent, CellView, ESCAPE_SIGN, FORMULA_SIGN};
pub use storage::{Sheet, Size};
