//! Prompt service implementation.
//!
//! Prompts are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new prompt does NOT require modifying this file.

use rmcp::model::{GetPromptResult, JsonObject, Prompt, PromptMessage, PromptMessageRole};
use tracing::info;

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for listing and instantiating prompts.
pub struct PromptService {
    /// Registered prompts in registration order.
    prompts: Vec<PromptTemplate>,
}

impl PromptService {
    pub fn new() -> Self {
        info!("Initializing PromptService");
        let prompts = get_all_prompts();
        for template in &prompts {
            info!("Registering prompt: {}", template.name);
        }
        Self { prompts }
    }

    fn find(&self, name: &str) -> Option<&PromptTemplate> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Validate the arguments and render the prompt as one user message.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self.find(name).ok_or_else(|| PromptError::not_found(name))?;
        let content = template.instantiate(arguments)?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;
    use serde_json::json;

    fn message_text(result: &GetPromptResult) -> String {
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => text.clone(),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_list_prompts() {
        let service = PromptService::new();
        let prompts = tokio_test::block_on(service.list_prompts());
        assert_eq!(prompts.len(), 1);
        let args = prompts[0].arguments.as_ref().unwrap();
        assert_eq!(args[0].name, "code");
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].name, "language");
        assert_eq!(args[1].required, Some(false));
    }

    #[tokio::test]
    async fn test_get_prompt_with_language() {
        let service = PromptService::new();
        let args = json!({"code": "fn main() {}", "language": "rust"})
            .as_object()
            .cloned();

        let result = service.get_prompt("code_review", args).await.unwrap();
        assert_eq!(result.messages.len(), 1);
        let text = message_text(&result);
        assert!(text.starts_with("Please review the following rust code:"));
        assert!(text.contains("```rust\nfn main() {}\n```"));
    }

    #[tokio::test]
    async fn test_get_prompt_without_language() {
        let service = PromptService::new();
        let args = json!({"code": "x = 1"}).as_object().cloned();

        let result = service.get_prompt("code_review", args).await.unwrap();
        let text = message_text(&result);
        assert!(text.starts_with("Please review the following code:"));
        assert!(text.contains("```\nx = 1\n```"));
    }

    #[tokio::test]
    async fn test_get_prompt_missing_required_argument() {
        let service = PromptService::new();
        let err = service.get_prompt("code_review", None).await.unwrap_err();
        assert!(matches!(err, PromptError::InvalidArguments(ref f) if f.field() == "code"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_prompt() {
        let service = PromptService::new();
        let result = service.get_prompt("nonexistent", None).await;
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
