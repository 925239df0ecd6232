//! HTTP submission of the current graph to the parse service.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::report::PipelineReport;
use crate::config::ApiConfig;
use crate::graph::{EdgeInstance, NodeInstance};

/// Failure submitting a pipeline.
///
/// All variants are locally recoverable: the user edits the graph or
/// retries; nothing here is fatal to the process. A graph the service
/// *rejects* (cycle, unknown node) is not an error at this layer; it comes
/// back inside [`PipelineReport::error`].
#[derive(Debug, Error, Diagnostic)]
pub enum GatewayError {
    #[error("pipeline service unreachable: {source}")]
    #[diagnostic(
        code(pipeweave::gateway::network),
        help("Check that the backend is running and PIPEWEAVE_API_BASE_URL points at it.")
    )]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(pipeweave::gateway::service))]
    Service { status: u16, message: String },

    #[error("malformed pipeline report: {source}")]
    #[diagnostic(code(pipeweave::gateway::malformed))]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },
}

/// Error body shape used by the service for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    nodes: &'a [NodeInstance],
    edges: &'a [EdgeInstance],
}

/// Serializes the graph, calls `POST /pipelines/parse`, and decodes the
/// report.
///
/// The gateway holds no graph state and performs no de-duplication of
/// concurrent calls. Result application, including the monotonic guard
/// against out-of-order completions, is
/// [`OutputApplier`](super::OutputApplier)'s job.
#[derive(Clone, Debug)]
pub struct PipelineGateway {
    base_url: String,
    client: reqwest::Client,
}

impl PipelineGateway {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Submit the graph and return the service's report.
    ///
    /// A non-2xx response yields [`GatewayError::Service`] carrying the
    /// body's `detail` message when present, else a generic failure message;
    /// no node state is touched on any error path.
    pub async fn submit(
        &self,
        nodes: &[NodeInstance],
        edges: &[EdgeInstance],
    ) -> Result<PipelineReport, GatewayError> {
        let url = format!("{}/pipelines/parse", self.base_url);
        tracing::debug!(%url, nodes = nodes.len(), edges = edges.len(), "submitting pipeline");

        let response = self
            .client
            .post(url)
            .json(&ParseRequest { nodes, edges })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or_else(|_| "Failed to parse pipeline".to_string());
            tracing::error!(status = status.as_u16(), %message, "pipeline submission rejected");
            return Err(GatewayError::Service {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| GatewayError::MalformedResponse { source })
    }
}
