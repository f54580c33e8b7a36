use anyhow::{Context, Result};
use serde::Serialize;

use super::{RowSink, TableSurface};
use crate::dashboard::rows::{Layout, Row, LOADING_MESSAGE};
use crate::dashboard::LoadError;

/// Collects rows and emits them, with the column headers, as JSON.
pub struct JsonSink {
    layout: Layout,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    layout: Layout,
    columns: &'static [&'static str],
    rows: &'a [Row],
}

impl JsonSink {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            rows: vec![Row::message(LOADING_MESSAGE, layout.column_count())],
        }
    }
}

impl RowSink for JsonSink {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: Row) -> Result<(), LoadError> {
        self.rows.push(row);
        Ok(())
    }
}

impl TableSurface for JsonSink {
    fn output(&self) -> Result<String> {
        let table = JsonTable {
            layout: self.layout,
            columns: self.layout.headers(),
            rows: &self.rows,
        };
        serde_json::to_string_pretty(&table).context("failed to serialize runs table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::rows::Cell;

    #[test]
    fn test_json_shape() {
        let mut sink = JsonSink::new(Layout::Canonical);
        sink.clear();
        sink.append_row(Row::Run {
            cells: vec![Cell::Link {
                text: "r1".to_string(),
                href: "http://host/reports/x.html".to_string(),
            }],
        })
        .unwrap();
        sink.append_row(Row::message("No test runs found.", 6)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&sink.output().unwrap()).unwrap();
        assert_eq!(value["layout"], "canonical");
        assert_eq!(value["columns"].as_array().unwrap().len(), 6);
        assert_eq!(value["rows"][0]["kind"], "run");
        assert_eq!(value["rows"][0]["cells"][0]["kind"], "link");
        assert_eq!(value["rows"][0]["cells"][0]["href"], "http://host/reports/x.html");
        assert_eq!(value["rows"][1]["kind"], "message");
        assert_eq!(value["rows"][1]["colspan"], 6);
    }
}
