//! Where node definitions come from.
//!
//! [`DefinitionSource`] is the seam between the registry and the outside
//! world: production code talks to the definition service over HTTP via
//! [`HttpDefinitionSource`]; tests swap in an in-memory source. The registry
//! itself never touches the network directly.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use super::definition::{NodeDefinition, NodeDefinitionDraft};
use crate::config::ApiConfig;

/// Failure talking to the definition service.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("definition service unreachable: {source}")]
    #[diagnostic(
        code(pipeweave::registry::network),
        help("Check that the backend is running and PIPEWEAVE_API_BASE_URL points at it.")
    )]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("definition service returned {status}: {message}")]
    #[diagnostic(code(pipeweave::registry::service))]
    Service { status: u16, message: String },

    #[error("malformed definition payload: {source}")]
    #[diagnostic(code(pipeweave::registry::malformed))]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}

/// Provider of the node-definition type universe.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Fetch the full, ordered definition list.
    async fn fetch_all(&self) -> Result<Vec<NodeDefinition>, SourceError>;

    /// Submit a newly authored schema; returns the created definition.
    async fn create(&self, draft: &NodeDefinitionDraft) -> Result<NodeDefinition, SourceError>;
}

/// HTTP-backed definition source (`GET /nodes/`, `POST /nodes/`).
#[derive(Clone, Debug)]
pub struct HttpDefinitionSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDefinitionSource {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn nodes_url(&self) -> String {
        format!("{}/nodes/", self.base_url)
    }
}

/// Error body shape used by the service for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

fn service_error(status: reqwest::StatusCode, body: &str, fallback: &str) -> SourceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| fallback.to_string());
    SourceError::Service {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl DefinitionSource for HttpDefinitionSource {
    async fn fetch_all(&self) -> Result<Vec<NodeDefinition>, SourceError> {
        let response = self.client.get(self.nodes_url()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(service_error(status, &body, "Failed to fetch nodes"));
        }
        serde_json::from_str(&body).map_err(|source| SourceError::Malformed { source })
    }

    async fn create(&self, draft: &NodeDefinitionDraft) -> Result<NodeDefinition, SourceError> {
        let response = self
            .client
            .post(self.nodes_url())
            .json(&draft.to_wire())
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(service_error(status, &body, "Failed to create node"));
        }
        serde_json::from_str(&body).map_err(|source| SourceError::Malformed { source })
    }
}
