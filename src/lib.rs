//! runs-dashboard -- renders test-run summaries from a test management API.
//!
//! The crate fetches the runs collection once, orders it newest first and
//! renders it into a pluggable table surface (terminal text, an HTML
//! `<tbody>` fragment, or JSON).

pub mod config;
pub mod dashboard;
pub mod render;
pub mod runs;

use anyhow::Result;

use crate::config::DashboardConfig;
use crate::dashboard::rows::RowBuilder;
use crate::dashboard::{DashboardState, RunsDashboard};
use crate::render::TableSurface;
use crate::runs::source::HttpRunsSource;

/// Load the runs described by `config` once and render them into `surface`.
///
/// Load failures are not errors here: they are rendered as the error row and
/// reported through the returned state. Only setup problems (such as an
/// unusable HTTP client) come back as `Err`.
pub async fn show(config: &DashboardConfig, surface: &mut dyn TableSurface) -> Result<DashboardState> {
    let source = HttpRunsSource::new(&config.api)?;
    tracing::info!(url = %source.url(), layout = %config.render.layout, "Loading test runs");

    let rows = RowBuilder::new(config.render.layout, config.render.time_format.clone());
    let dashboard = RunsDashboard::new(source, rows);
    Ok(dashboard.load_and_render(surface).await)
}
