//! Resource service implementation.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new resource does NOT require modifying this file.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use std::time::Instant;
use tracing::info;

use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::config::ServerConfig;
use crate::domains::tools::ToolSummary;

/// Server state resources render from.
#[derive(Debug, Clone)]
pub struct ResourceContext {
    pub server: ServerConfig,
    pub tools: Vec<ToolSummary>,
    pub started_at: Instant,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Builds the content at read time.
    pub render: fn(&ResourceContext) -> Result<String, ResourceError>,
}

/// Service for listing and reading resources.
pub struct ResourceService {
    context: ResourceContext,

    /// Registered resources in registration order.
    resources: Vec<ResourceEntry>,
}

impl ResourceService {
    pub fn new(context: ResourceContext) -> Self {
        info!("Initializing ResourceService");
        let resources = get_all_resources();
        for entry in &resources {
            info!("Registering resource: {}", entry.resource.raw.uri);
        }
        Self { context, resources }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .iter()
            .find(|entry| entry.resource.raw.uri == uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let text = (entry.render)(&self.context)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: entry.resource.raw.mime_type.clone(),
                text,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn service() -> ResourceService {
        ResourceService::new(ResourceContext {
            server: Config::default().server,
            tools: Vec::new(),
            started_at: Instant::now(),
        })
    }

    #[tokio::test]
    async fn test_list_resources() {
        let resources = service().list_resources().await;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, "mcp://server/info");
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let result = service().read_resource("mcp://server/info").await.unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                mime_type, text, ..
            } => {
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                let value: serde_json::Value = serde_json::from_str(text).unwrap();
                assert!(value["tools"].as_array().unwrap().is_empty());
            }
            other => panic!("unexpected contents: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let result = service().read_resource("mcp://server/nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
