use super::{decode_runs, TestRunSummary};
use crate::config::ApiConfig;
use crate::dashboard::LoadError;
use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

/// Anything that can produce the current collection of test runs.
#[async_trait::async_trait]
pub trait RunsSource: Send + Sync {
    /// Fetch and decode the runs collection.
    /// Order of the returned runs carries no meaning.
    async fn fetch(&self) -> Result<Vec<TestRunSummary>, LoadError>;
}

/// Runs source backed by `GET {base_url}{runs_path}` on the test management API.
pub struct HttpRunsSource {
    client: Client,
    url: String,
    query: Vec<(&'static str, String)>,
}

impl HttpRunsSource {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: api.runs_url(),
            query: api.query(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl RunsSource for HttpRunsSource {
    async fn fetch(&self) -> Result<Vec<TestRunSummary>, LoadError> {
        debug!(url = %self.url, query = ?self.query, "requesting test runs");

        let response = self
            .client
            .get(&self.url)
            .query(&self.query)
            .send()
            .await
            .map_err(LoadError::transport)?;

        let status = response.status();
        if !status.is_success() {
            // Body is deliberately left unread.
            return Err(LoadError::status(status));
        }

        let body = response.bytes().await.map_err(LoadError::transport)?;
        let runs = decode_runs(&body)?;
        debug!(count = runs.len(), bytes = body.len(), "decoded test runs");
        Ok(runs)
    }
}
