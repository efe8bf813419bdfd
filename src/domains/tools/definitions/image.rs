//! Text-to-image generation tool.

use async_trait::async_trait;
use rmcp::model::Role;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::clients::{ImageClient, to_binary};
use crate::domains::tools::{
    ContentEnvelope, ImageContent, Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput,
};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateImageParams {
    pub prompt: String,
}

pub struct ImageTool {
    client: ImageClient,
    token: Option<String>,
}

impl ImageTool {
    pub const NAME: &'static str = "generate_image";
    pub const DESCRIPTION: &'static str = "Generate an image from a text prompt.";

    /// A blank token is treated as missing.
    pub fn new(client: ImageClient, token: Option<String>) -> Self {
        Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn input_schema() -> Schema {
        Schema::object()
            .required(
                "prompt",
                Schema::string()
                    .min_length(1)
                    .describe("Description of the image to generate"),
            )
            .into()
    }

    pub fn output_schema() -> Schema {
        Schema::object()
            .required("prompt", Schema::string())
            .required("model", Schema::string())
            .required("mime_type", Schema::string())
            .required("size_bytes", Schema::integer().min(1.0))
            .into()
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            Self::input_schema(),
            Self::output_schema(),
            self,
        )
    }

    pub async fn execute(
        &self,
        params: &GenerateImageParams,
    ) -> Result<ContentEnvelope, ToolError> {
        let token = self.token.as_deref().ok_or_else(|| {
            ToolError::configuration(
                "Image generation is not configured: set MCP_HF_TOKEN or HF_TOKEN",
            )
        })?;

        let image = self.client.generate(token, &params.prompt).await?;
        let bytes = to_binary(image.payload).await?;
        info!(size = bytes.len(), mime = %image.mime_type, "Image generated");

        let structured = json!({
            "prompt": params.prompt,
            "model": self.client.model(),
            "mime_type": image.mime_type,
            "size_bytes": bytes.len(),
        });
        Ok(
            ContentEnvelope::text(format!("Generated image for prompt: {}", params.prompt))
                .with_item(
                    ImageContent::new(bytes, image.mime_type)
                        .with_audience(vec![Role::User])
                        .with_priority(1.0),
                )
                .with_structured(structured),
        )
    }
}

#[async_trait]
impl ToolHandler for ImageTool {
    async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
        let params: GenerateImageParams = input.parse()?;
        Ok(self
            .execute(&params)
            .await
            .unwrap_or_else(ToolError::into_envelope))
    }
}
