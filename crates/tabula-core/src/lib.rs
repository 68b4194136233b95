//! tabula-core - Sheet storage, dependency graph and rendering.

pub mod config;
pub mod error;
pub mod sheet;

pub use config::{Limits, SheetConfig};
pub use error::{Result, SheetError};
pub use sheet::{Cell, CellContent, CellView, Sheet, Size};

pub use tabula_engine::{FormulaError, Position, Value};
