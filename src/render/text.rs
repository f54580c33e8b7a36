//! Plain-text table for terminal output.

use anyhow::Result;

use super::{RowSink, TableSurface};
use crate::dashboard::rows::{Cell, Layout, Row, LOADING_MESSAGE};
use crate::dashboard::LoadError;

pub struct TextTableSink {
    layout: Layout,
    rows: Vec<Row>,
}

impl TextTableSink {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            rows: vec![Row::message(LOADING_MESSAGE, layout.column_count())],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .layout
            .headers()
            .iter()
            .map(|h| h.chars().count())
            .collect();
        for row in &self.rows {
            for (i, cell) in row.cells().iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell_text(cell).chars().count());
                }
            }
        }
        widths
    }
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Link { text, href } => format!("{text} <{href}>"),
        other => other.label().to_string(),
    }
}

fn join_padded<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(v, w)| format!("{:<w$}", v, w = *w))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl RowSink for TextTableSink {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: Row) -> Result<(), LoadError> {
        if let Row::Run { cells } = &row {
            if cells.len() != self.layout.column_count() {
                return Err(LoadError::Render(format!(
                    "row has {} cells, {} layout has {} columns",
                    cells.len(),
                    self.layout,
                    self.layout.column_count()
                )));
            }
        }
        self.rows.push(row);
        Ok(())
    }
}

impl TableSurface for TextTableSink {
    fn output(&self) -> Result<String> {
        let widths = self.widths();
        let mut out = String::new();

        out.push_str(join_padded(self.layout.headers().iter().copied(), &widths).trim_end());
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-|-"));
        out.push('\n');

        for row in &self.rows {
            let line = match row {
                Row::Run { cells } => {
                    let texts: Vec<String> = cells.iter().map(cell_text).collect();
                    join_padded(texts.iter().map(String::as_str), &widths)
                }
                Row::Message { text, .. } => text.clone(),
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}
