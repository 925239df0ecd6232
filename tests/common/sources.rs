use async_trait::async_trait;

use pipeweave::registry::{
    DefinitionSource, NodeDefinition, NodeDefinitionDraft, SourceError,
};

/// In-memory definition source serving a fixed universe.
pub struct StaticDefinitionSource {
    definitions: Vec<NodeDefinition>,
}

impl StaticDefinitionSource {
    pub fn new(definitions: Vec<NodeDefinition>) -> Self {
        Self { definitions }
    }
}

#[async_trait]
impl DefinitionSource for StaticDefinitionSource {
    async fn fetch_all(&self) -> Result<Vec<NodeDefinition>, SourceError> {
        Ok(self.definitions.clone())
    }

    async fn create(&self, draft: &NodeDefinitionDraft) -> Result<NodeDefinition, SourceError> {
        Ok(draft.to_wire())
    }
}

/// A source whose every call fails, for offline/error-path tests.
pub struct FailingSource;

#[async_trait]
impl DefinitionSource for FailingSource {
    async fn fetch_all(&self) -> Result<Vec<NodeDefinition>, SourceError> {
        Err(SourceError::Service {
            status: 503,
            message: "definition service down".to_string(),
        })
    }

    async fn create(&self, _draft: &NodeDefinitionDraft) -> Result<NodeDefinition, SourceError> {
        Err(SourceError::Service {
            status: 503,
            message: "definition service down".to_string(),
        })
    }
}
