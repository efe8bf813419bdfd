//! The content envelope every tool invocation produces.

use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{Annotations, CallToolResult, Content, Role};
use serde_json::Value;

/// One piece of tool output.
#[derive(Debug, Clone)]
pub enum ContentItem {
    Text(String),
    Image(ImageContent),
}

/// Raw image bytes plus optional presentation hints.
#[derive(Debug, Clone)]
pub struct ImageContent {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub audience: Option<Vec<Role>>,
    pub priority: Option<f32>,
}

impl ImageContent {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            audience: None,
            priority: None,
        }
    }

    pub fn with_audience(mut self, audience: Vec<Role>) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Priority is clamped to `[0, 1]`.
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority.clamp(0.0, 1.0));
        self
    }
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    fn into_content(self) -> Content {
        match self {
            Self::Text(text) => Content::text(text),
            Self::Image(image) => {
                let mut content = Content::image(STANDARD.encode(&image.bytes), image.mime_type);
                if image.audience.is_some() || image.priority.is_some() {
                    let mut annotations = Annotations::default();
                    annotations.audience = image.audience;
                    annotations.priority = image.priority;
                    content.annotations = Some(annotations);
                }
                content
            }
        }
    }
}

impl From<ImageContent> for ContentItem {
    fn from(image: ImageContent) -> Self {
        Self::Image(image)
    }
}

/// An ordered, non-empty sequence of content items.
///
/// Success and failure share this shape: failures are a single text item
/// beginning with `Error:`. An optional structured value mirrors the items
/// for clients that consume the tool's output schema.
#[derive(Debug, Clone)]
pub struct ContentEnvelope {
    items: Vec<ContentItem>,
    structured: Option<Value>,
    error: bool,
}

impl ContentEnvelope {
    pub fn new(first: impl Into<ContentItem>) -> Self {
        Self {
            items: vec![first.into()],
            structured: None,
            error: false,
        }
    }

    /// A failure: one `Error: <message>` text item and no structured mirror.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            error: true,
            ..Self::text(format!("Error: {}", message))
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ContentItem::text(text))
    }

    pub fn with_item(mut self, item: impl Into<ContentItem>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn with_structured(mut self, structured: Value) -> Self {
        self.structured = Some(structured);
        self
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn structured(&self) -> Option<&Value> {
        self.structured.as_ref()
    }

    /// Text of the first item, when it is a text item.
    pub fn first_text(&self) -> Option<&str> {
        self.items.first().and_then(ContentItem::as_text)
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Failures are flagged `isError` and never carry structured content, so
    /// results stay consistent with the advertised output schema.
    pub fn into_call_tool_result(self) -> CallToolResult {
        let content = self
            .items
            .into_iter()
            .map(ContentItem::into_content)
            .collect();
        if self.error {
            return CallToolResult::error(content);
        }
        let mut result = CallToolResult::success(content);
        result.structured_content = self.structured;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_never_empty() {
        let envelope = ContentEnvelope::text("hello");
        assert_eq!(envelope.items().len(), 1);
        assert_eq!(envelope.first_text(), Some("hello"));
        assert!(!envelope.is_error());
    }

    #[test]
    fn test_error_envelope() {
        let envelope = ContentEnvelope::error("boom");
        assert!(envelope.is_error());
        assert_eq!(envelope.first_text(), Some("Error: boom"));
        assert_eq!(envelope.items().len(), 1);
    }

    #[test]
    fn test_error_result_is_flagged_without_structured_content() {
        let result = ContentEnvelope::error("boom")
            .with_structured(json!({"result": 1.0}))
            .into_call_tool_result();
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["text"], "Error: boom");
    }

    #[test]
    fn test_priority_is_clamped() {
        let image = ImageContent::new(vec![1], "image/png").with_priority(3.5);
        assert_eq!(image.priority, Some(1.0));
        let image = ImageContent::new(vec![1], "image/png").with_priority(-1.0);
        assert_eq!(image.priority, Some(0.0));
    }

    #[test]
    fn test_image_is_base64_encoded_with_annotations() {
        let envelope = ContentEnvelope::text("caption").with_item(
            ImageContent::new(vec![0x89, b'P', b'N', b'G'], "image/png")
                .with_audience(vec![Role::User])
                .with_priority(1.0),
        );
        let result = envelope.into_call_tool_result();
        let value = serde_json::to_value(&result).unwrap();

        let items = value["content"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "text");
        assert_eq!(items[0]["text"], "caption");
        assert_eq!(items[1]["type"], "image");
        assert_eq!(items[1]["mimeType"], "image/png");
        assert_eq!(items[1]["data"], STANDARD.encode([0x89, b'P', b'N', b'G']));
        assert_eq!(items[1]["annotations"]["audience"], json!(["user"]));
        assert_eq!(items[1]["annotations"]["priority"], json!(1.0));
    }

    #[test]
    fn test_structured_content_is_carried() {
        let result = ContentEnvelope::text("6 * 7 = 42")
            .with_structured(json!({"result": 42.0}))
            .into_call_tool_result();
        assert_eq!(result.structured_content, Some(json!({"result": 42.0})));
        assert_eq!(result.is_error, Some(false));
    }
}
