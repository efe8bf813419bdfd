//! Tool Registry - the set of tools this server offers.
//!
//! Each tool is described once by a [`ToolDescriptor`]: its name, its input
//! and output schemas and the handler that runs it. The registry keeps them in
//! registration order, which is the order `tools/list` reports.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::Tool;
use serde::Serialize;
use tracing::{debug, info};

use crate::clients::{self, GeocodingClient, ImageClient, WeatherClient};
use crate::core::config::Config;

use super::content::ContentEnvelope;
use super::definitions::{CalculateTool, GeocodeTool, GreetTool, ImageTool, TimeTool, WeatherTool};
use super::error::{RegistryError, ToolError};
use super::schema::Schema;
use super::validator::ValidatedInput;

/// Executes a tool on arguments already validated against its input schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError>;
}

/// Everything the server knows about one tool.
pub struct ToolDescriptor {
    name: String,
    description: String,
    input_schema: Schema,
    output_schema: Schema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: impl Into<Schema>,
        output_schema: impl Into<Schema>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema.into(),
            output_schema: output_schema.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn handler(&self) -> &dyn ToolHandler {
        self.handler.as_ref()
    }

    /// Convert to the rmcp tool model advertised in `tools/list`.
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema.to_json_schema()),
            annotations: None,
            output_schema: Some(Arc::new(self.output_schema.to_json_schema())),
            icons: None,
            meta: None,
            title: None,
        }
    }

    fn check(&self) -> Result<(), RegistryError> {
        let invalid = |which: &'static str, reason: String| RegistryError::InvalidSchema {
            tool: self.name.clone(),
            which,
            reason,
        };
        if !matches!(self.input_schema, Schema::Object(_)) {
            return Err(invalid("input", "root must be an object".to_string()));
        }
        self.input_schema.check().map_err(|r| invalid("input", r))?;
        self.output_schema.check().map_err(|r| invalid("output", r))
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name and description pair, as reported by the server info resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// Ordered collection of tool descriptors with unique names.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool after checking its schemas and name uniqueness.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(RegistryError::DuplicateToolName(descriptor.name.clone()));
        }
        descriptor.check()?;

        debug!(tool = %descriptor.name, "Registered tool");
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn summaries(&self) -> Vec<ToolSummary> {
        self.tools
            .iter()
            .map(|t| ToolSummary {
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the registry of every tool this server ships.
pub fn build_registry(config: &Config) -> crate::core::Result<ToolRegistry> {
    let http = clients::build_http_client(&config.providers)?;

    let mut registry = ToolRegistry::new();
    registry.register(GreetTool::descriptor())?;
    registry.register(CalculateTool::descriptor())?;
    registry.register(TimeTool::new(config.tools.default_timezone.clone()).descriptor())?;
    registry.register(
        GeocodeTool::new(GeocodingClient::new(
            http.clone(),
            config.providers.geocoding_url.clone(),
        ))
        .descriptor(),
    )?;
    registry.register(
        WeatherTool::new(WeatherClient::new(
            http.clone(),
            config.providers.weather_url.clone(),
        ))
        .descriptor(),
    )?;
    registry.register(
        ImageTool::new(
            ImageClient::new(http, &config.providers),
            config.credentials.hf_token.clone(),
        )
        .descriptor(),
    )?;

    info!(count = registry.len(), "Tool registry built");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
            Ok(ContentEnvelope::text(input.into_value().to_string()))
        }
    }

    fn echo(name: &str) -> ToolDescriptor {
        ToolDescriptor::new(
            name,
            "Echo arguments",
            Schema::object().optional("text", Schema::string()),
            Schema::object(),
            EchoTool,
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("b")).unwrap();
        registry.register(echo("a")).unwrap();

        assert_eq!(registry.tool_names(), vec!["b", "a"]);
        assert!(registry.lookup("a").is_some());
        assert!(registry.lookup("c").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo("dup")).unwrap();
        let err = registry.register(echo("dup")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateToolName(ref n) if n == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        let mut registry = ToolRegistry::new();
        let bad = ToolDescriptor::new(
            "bad",
            "Bad defaults",
            Schema::object().optional_with_default("n", Schema::integer().max(3.0), 10),
            Schema::object(),
            EchoTool,
        );
        let err = registry.register(bad).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchema { which: "input", .. }));

        let not_object = ToolDescriptor::new("flat", "x", Schema::string(), Schema::object(), EchoTool);
        assert!(registry.register(not_object).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_to_tool_advertises_both_schemas() {
        let tool = echo("echo").to_tool();
        assert_eq!(tool.name, "echo");
        assert_eq!(tool.input_schema.get("type").unwrap(), "object");
        assert!(tool.output_schema.is_some());
    }

    #[test]
    fn test_build_registry_order() {
        let registry = build_registry(&Config::default()).unwrap();
        assert_eq!(
            registry.tool_names(),
            vec![
                "greet",
                "calculate",
                "get_time",
                "geocode",
                "get_weather",
                "generate_image"
            ]
        );
        let summaries = registry.summaries();
        assert_eq!(summaries[0].name, "greet");
        assert!(!summaries[0].description.is_empty());
    }
}
