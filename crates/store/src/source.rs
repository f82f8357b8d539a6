//! Settings sources.
//!
//! The document can come from an HTTP endpoint (deployed mode) or a local
//! JSON file (dev and demo mode). Both yield the same [`ConfigDocument`];
//! everything downstream is source-agnostic.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use switchboard_config::{ConfigDocument, SourceConfig};
use switchboard_core::StoreError;

/// A place the settings document can be fetched from.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Where this source reads from, for logs and diagnostics.
    fn describe(&self) -> String;

    /// Fetch and parse the current document.
    async fn fetch(&self) -> Result<ConfigDocument, StoreError>;
}

/// Fetches the settings document from an HTTP endpoint.
pub struct HttpSettingsSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSettingsSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl SettingsSource for HttpSettingsSource {
    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn fetch(&self) -> Result<ConfigDocument, StoreError> {
        debug!(endpoint = %self.endpoint, "Fetching settings document");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Http { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Reads the settings document from a local JSON file.
pub struct FileSettingsSource {
    path: PathBuf,
}

impl FileSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsSource for FileSettingsSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<ConfigDocument, StoreError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| StoreError::Io {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })?;

        serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Build the source named by bootstrap configuration.
pub fn source_from_config(config: &SourceConfig) -> Box<dyn SettingsSource> {
    match config {
        SourceConfig::File { path } => Box::new(FileSettingsSource::new(path.clone())),
        SourceConfig::Http { endpoint } => Box::new(HttpSettingsSource::new(endpoint.clone())),
    }
}
