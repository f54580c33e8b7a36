//! Row model and the transform from runs to table rows.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::LoadError;
use crate::runs::TestRunSummary;

/// Placeholder shown before a load has finished.
pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No test runs found.";
pub const ERROR_PREFIX: &str = "Error loading data: ";
pub const NOT_AVAILABLE: &str = "N/A";

/// Column layout of the runs table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Report link, environment, status badge, failed count, start, end.
    #[default]
    Canonical,
    /// Earlier dashboard shape: plain id, environment, status, passed and
    /// failed counts, start, end.
    Legacy,
}

impl Layout {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Layout::Canonical => &[
                "Run ID",
                "Environment",
                "Status",
                "Failed",
                "Start Time",
                "End Time",
            ],
            Layout::Legacy => &[
                "Run ID",
                "Environment",
                "Status",
                "Passed",
                "Failed",
                "Start Time",
                "End Time",
            ],
        }
    }

    pub fn column_count(self) -> usize {
        self.headers().len()
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Canonical => write!(f, "canonical"),
            Layout::Legacy => write!(f, "legacy"),
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },
    /// Hyperlink opening in a new browsing context.
    Link { text: String, href: String },
    /// Status badge; `class` embeds the lower-cased status.
    Badge { text: String, class: String },
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text { text: value.into() }
    }

    /// Visible text of the cell, whatever its kind.
    pub fn label(&self) -> &str {
        match self {
            Cell::Text { text } | Cell::Link { text, .. } | Cell::Badge { text, .. } => text,
        }
    }
}

/// A single table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    /// One test run, cells in layout order.
    Run { cells: Vec<Cell> },
    /// Informational row spanning `colspan` columns.
    Message { text: String, colspan: usize },
}

impl Row {
    pub fn message(text: impl Into<String>, colspan: usize) -> Self {
        Row::Message {
            text: text.into(),
            colspan,
        }
    }

    pub fn error(err: &LoadError, colspan: usize) -> Self {
        Row::message(format!("{ERROR_PREFIX}{err}"), colspan)
    }

    pub fn cells(&self) -> &[Cell] {
        match self {
            Row::Run { cells } => cells,
            Row::Message { .. } => &[],
        }
    }
}

/// Order runs most-recent-start first. Runs with equal start times keep
/// their relative input order.
pub fn sort_newest_first(runs: &mut [TestRunSummary]) {
    runs.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

/// Render an instant in the local time zone with a chrono `strftime` pattern.
pub fn format_timestamp(instant: &DateTime<Utc>, pattern: &str) -> Result<String, LoadError> {
    let mut out = String::new();
    write!(out, "{}", instant.with_timezone(&Local).format(pattern))
        .map_err(|_| LoadError::Render(format!("invalid time format {pattern:?}")))?;
    Ok(out)
}

/// Builds table rows from decoded runs.
#[derive(Debug, Clone)]
pub struct RowBuilder {
    layout: Layout,
    time_format: String,
}

impl RowBuilder {
    pub fn new(layout: Layout, time_format: impl Into<String>) -> Self {
        Self {
            layout,
            time_format: time_format.into(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Sort and convert the whole collection. An empty collection yields
    /// the single "no runs" message row.
    pub fn build(&self, mut runs: Vec<TestRunSummary>) -> Result<Vec<Row>, LoadError> {
        if runs.is_empty() {
            return Ok(vec![Row::message(EMPTY_MESSAGE, self.layout.column_count())]);
        }
        sort_newest_first(&mut runs);
        runs.iter().map(|run| self.run_row(run)).collect()
    }

    pub fn run_row(&self, run: &TestRunSummary) -> Result<Row, LoadError> {
        let start = format_timestamp(&run.start_time, &self.time_format)?;
        let end = match &run.end_time {
            Some(end) => format_timestamp(end, &self.time_format)?,
            None => NOT_AVAILABLE.to_string(),
        };
        let status = Cell::Badge {
            text: run.status.clone(),
            class: run.status_class(),
        };

        let cells = match self.layout {
            Layout::Canonical => vec![
                identifier_cell(run),
                Cell::text(&run.environment),
                status,
                Cell::text(run.failed_test_count.to_string()),
                Cell::text(start),
                Cell::text(end),
            ],
            Layout::Legacy => vec![
                Cell::text(&run.id),
                Cell::text(&run.environment),
                status,
                Cell::text(run.passed_test_count.to_string()),
                Cell::text(run.failed_test_count.to_string()),
                Cell::text(start),
                Cell::text(end),
            ],
        };
        Ok(Row::Run { cells })
    }
}

fn identifier_cell(run: &TestRunSummary) -> Cell {
    match run.report_link() {
        Some(href) => Cell::Link {
            text: run.id.clone(),
            href: href.to_string(),
        },
        None => Cell::text(&run.id),
    }
}
