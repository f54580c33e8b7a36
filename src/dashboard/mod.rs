//! The runs dashboard: fetch, sort, render, with a single error boundary.

pub mod rows;

use thiserror::Error;
use tracing::{error, info};

use self::rows::{Row, RowBuilder};
use crate::render::RowSink;
use crate::runs::source::RunsSource;

#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport failure, non-success status, or unreadable body.
    #[error("{0}")]
    Network(String),

    /// Body is not JSON, or not an array of runs.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Render(String),
}

impl LoadError {
    pub fn status(status: reqwest::StatusCode) -> Self {
        LoadError::Network(format!("network response was not ok: {status}"))
    }

    /// Flattens the reqwest error and its causes into one message.
    pub fn transport(err: reqwest::Error) -> Self {
        use std::error::Error as _;

        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        LoadError::Network(message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Network(_) => ErrorKind::Network,
            LoadError::Decode(_) => ErrorKind::Decode,
            LoadError::Render(_) => ErrorKind::Render,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
    Render,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Render => write!(f, "render"),
        }
    }
}

/// Lifecycle of one dashboard load.
///
/// `Loading` is the only initial state; `Rendered` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    /// `runs` is the number of runs shown (zero when the API had none).
    Rendered { runs: usize },
    Failed { kind: ErrorKind, message: String },
}

impl DashboardState {
    pub fn is_failed(&self) -> bool {
        matches!(self, DashboardState::Failed { .. })
    }
}

/// Loads test runs from a [`RunsSource`] and renders them into a [`RowSink`].
pub struct RunsDashboard<S> {
    source: S,
    rows: RowBuilder,
}

impl<S: RunsSource> RunsDashboard<S> {
    pub fn new(source: S, rows: RowBuilder) -> Self {
        Self { source, rows }
    }

    /// Run the fetch-then-render pipeline once.
    ///
    /// Consumes the dashboard: a load cannot be restarted, only replaced by
    /// a fresh dashboard. Every failure ends up as a single error row in
    /// `sink`; the returned state says which way it went. The dashboard is
    /// `Loading` until this returns.
    pub async fn load_and_render<K>(self, sink: &mut K) -> DashboardState
    where
        K: RowSink + ?Sized,
    {
        let columns = self.rows.layout().column_count();

        match self.try_load_and_render(sink).await {
            Ok(runs) => {
                info!(runs, "rendered test runs");
                DashboardState::Rendered { runs }
            }
            Err(err) => {
                error!(error = %err, kind = %err.kind(), "error fetching test runs");
                sink.clear();
                if let Err(render_err) = sink.append_row(Row::error(&err, columns)) {
                    error!(error = %render_err, "could not render error row");
                }
                DashboardState::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                }
            }
        }
    }

    async fn try_load_and_render<K>(&self, sink: &mut K) -> Result<usize, LoadError>
    where
        K: RowSink + ?Sized,
    {
        let runs = self.source.fetch().await?;
        let count = runs.len();

        // Rows are fully built before the sink is touched.
        let rows = self.rows.build(runs)?;

        sink.clear();
        for row in rows {
            sink.append_row(row)?;
        }
        Ok(count)
    }
}
