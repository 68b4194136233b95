//! Tab-separated rendering of the occupied region.

use std::io::Write;

use super::cell::Cell;
use super::storage::Sheet;
use crate::error::Result;

impl Sheet {
    /// Write computed values, one line per row of the printable area.
    pub fn print_values<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.render_values().as_bytes())?;
        Ok(())
    }

    /// Write literal cell texts, one line per row of the printable area.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.render_texts().as_bytes())?;
        Ok(())
    }

    pub fn render_values(&self) -> String {
        self.render_with(|cell| cell.value(self).to_string())
    }

    pub fn render_texts(&self) -> String {
        self.render_with(Cell::text)
    }

    /// Every line has `cols - 1` tabs; absent rows and cells render as
    /// nothing between their separators.
    fn render_with(&self, render: impl Fn(&Cell) -> String) -> String {
        let size = self.printable_size();
        let last_col = size.cols - 1;
        let mut out = String::new();

        let mut next_row = 0;
        for (&row_index, row) in &self.rows {
            for _ in next_row..row_index {
                push_tabs(&mut out, last_col);
                out.push('\n');
            }
            next_row = row_index + 1;

            let mut cursor = 0;
            for (&col, cell) in row.iter() {
                push_tabs(&mut out, col - cursor);
                out.push_str(&render(cell));
                cursor = col;
            }
            push_tabs(&mut out, last_col - cursor);
            out.push('\n');
        }
        out
    }
}

fn push_tabs(out: &mut String, count: i32) {
    for _ in 0..count.max(0) {
        out.push('\t');
    }
}
