//! Greeting tool.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domains::tools::{
    ContentEnvelope, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GreetParams {
    pub name: String,
}

pub struct GreetTool;

impl GreetTool {
    pub const NAME: &'static str = "greet";
    pub const DESCRIPTION: &'static str = "Greet someone by name.";

    pub fn input_schema() -> Schema {
        Schema::object()
            .required(
                "name",
                Schema::string()
                    .min_length(1)
                    .describe("Name of the person to greet"),
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        Schema::object()
            .required("message", Schema::string())
            .into()
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::input_schema(),
            Self::output_schema(),
            Self,
        )
    }

    pub fn execute(params: &GreetParams) -> ContentEnvelope {
        let message = format!("Hello, {}! Welcome to the toolkit MCP server.", params.name);
        ContentEnvelope::text(message.clone()).with_structured(json!({ "message": message }))
    }
}

#[async_trait]
impl ToolHandler for GreetTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: GreetParams = input.parse()?;
        Ok(Self::execute(&params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet() {
        let envelope = GreetTool::execute(&GreetParams {
            name: "Ada".to_string(),
        });
        assert_eq!(
            envelope.first_text(),
            Some("Hello, Ada! Welcome to the toolkit MCP server.")
        );
        assert_eq!(
            envelope.structured().unwrap()["message"],
            "Hello, Ada! Welcome to the toolkit MCP server."
        );
    }
}
