//! Rendering surfaces for the runs table.

pub mod html;
pub mod json;
pub mod text;

use anyhow::Result;

use crate::config::RenderConfig;
use crate::dashboard::rows::Row;
use crate::dashboard::LoadError;

/// Where rendered rows go.
///
/// A load clears the sink once and then appends rows top to bottom.
pub trait RowSink {
    /// Remove every row, including any placeholder.
    fn clear(&mut self);

    fn append_row(&mut self, row: Row) -> Result<(), LoadError>;
}

/// A sink that can be turned into displayable output.
pub trait TableSurface: RowSink {
    fn output(&self) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text table for terminals.
    #[default]
    Text,
    /// `<tbody>` fragment for embedding in a host page.
    Html,
    /// Row model as JSON.
    Json,
}

/// Build an empty surface of the requested format, showing the loading
/// placeholder.
pub fn surface(format: OutputFormat, cfg: &RenderConfig) -> Box<dyn TableSurface> {
    match format {
        OutputFormat::Text => Box::new(text::TextTableSink::new(cfg.layout)),
        OutputFormat::Html => Box::new(html::HtmlTableSink::new(cfg.layout, &cfg.element_id)),
        OutputFormat::Json => Box::new(json::JsonSink::new(cfg.layout)),
    }
}
