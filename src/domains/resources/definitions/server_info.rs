//! Server info resource definition.

use chrono::{SecondsFormat, Utc};
use serde_json::json;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::service::ResourceContext;

/// Server identity, tool catalogue and uptime.
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "mcp://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str = "Server identity, available tools and uptime";
    const MIME_TYPE: &'static str = "application/json";

    fn render(context: &ResourceContext) -> Result<String, ResourceError> {
        let info = json!({
            "server": {
                "name": context.server.name,
                "version": context.server.version,
                "description": context.server.description,
            },
            "tools": context.tools,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "uptime": context.started_at.elapsed().as_secs(),
        });

        serde_json::to_string_pretty(&info).map_err(|e| ResourceError::internal(e.to_string()))
    }
}
