//! HTML `<tbody>` fragment, rendered through an askama template.
//!
//! The host page owns the `<table>`, its headers and styles; this sink only
//! produces the body element it swaps in. All text and attribute values are
//! escaped by the template.

use anyhow::{Context, Result};
use askama::Template;

use super::{RowSink, TableSurface};
use crate::dashboard::rows::{Cell, Layout, Row, LOADING_MESSAGE};
use crate::dashboard::LoadError;

#[derive(Template)]
#[template(path = "runs_table_body.html")]
struct TableBodyTemplate<'a> {
    element_id: &'a str,
    rows: Vec<RowView<'a>>,
}

struct RowView<'a> {
    cells: Vec<CellView<'a>>,
}

/// Flattened cell: empty `href` means no link, empty `class` means no badge.
struct CellView<'a> {
    text: &'a str,
    href: &'a str,
    class: &'a str,
    colspan: usize,
}

impl<'a> CellView<'a> {
    fn from_cell(cell: &'a Cell) -> Self {
        let (href, class) = match cell {
            Cell::Text { .. } => ("", ""),
            Cell::Link { href, .. } => (href.as_str(), ""),
            Cell::Badge { class, .. } => ("", class.as_str()),
        };
        Self {
            text: cell.label(),
            href,
            class,
            colspan: 1,
        }
    }
}

impl<'a> RowView<'a> {
    fn from_row(row: &'a Row) -> Self {
        let cells = match row {
            Row::Run { cells } => cells.iter().map(CellView::from_cell).collect(),
            Row::Message { text, colspan } => vec![CellView {
                text,
                href: "",
                class: "",
                colspan: *colspan,
            }],
        };
        Self { cells }
    }
}

pub struct HtmlTableSink {
    element_id: String,
    rows: Vec<Row>,
}

impl HtmlTableSink {
    pub fn new(layout: Layout, element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            rows: vec![Row::message(LOADING_MESSAGE, layout.column_count())],
        }
    }
}

impl RowSink for HtmlTableSink {
    fn clear(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, row: Row) -> Result<(), LoadError> {
        self.rows.push(row);
        Ok(())
    }
}

impl TableSurface for HtmlTableSink {
    fn output(&self) -> Result<String> {
        let template = TableBodyTemplate {
            element_id: &self.element_id,
            rows: self.rows.iter().map(RowView::from_row).collect(),
        };
        template.render().context("failed to render runs table body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(rows: Vec<Row>) -> String {
        let mut sink = HtmlTableSink::new(Layout::Canonical, "runs-table-body");
        sink.clear();
        for row in rows {
            sink.append_row(row).unwrap();
        }
        sink.output().unwrap()
    }

    #[test]
    fn test_placeholder_before_load() {
        let html = HtmlTableSink::new(Layout::Canonical, "runs-table-body")
            .output()
            .unwrap();
        assert!(html.starts_with(r#"<tbody id="runs-table-body">"#));
        assert!(html.contains(r#"<td colspan="6">Loading...</td>"#));
    }

    #[test]
    fn test_message_row_spans_all_columns() {
        let html = rendered(vec![Row::message("No test runs found.", 6)]);
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(html.contains(r#"<td colspan="6">No test runs found.</td>"#));
    }

    #[test]
    fn test_link_badge_and_text_cells() {
        let html = rendered(vec![Row::Run {
            cells: vec![
                Cell::Link {
                    text: "r1".to_string(),
                    href: "http://host/reports/x.html".to_string(),
                },
                Cell::Badge {
                    text: "FAILED".to_string(),
                    class: "status-failed".to_string(),
                },
                Cell::text("3"),
            ],
        }]);

        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(">r1</a>"));
        assert!(html.contains(r#"<span class="status-badge status-failed">FAILED</span>"#));
        assert!(html.contains("<td>3</td>"));
        assert!(!html.contains("colspan"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = rendered(vec![Row::Run {
            cells: vec![Cell::text("<script>alert(1)</script>")],
        }]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
