//! Code review prompt definition.

use super::PromptDefinition;
use crate::domains::tools::Schema;

/// A code review prompt template.
pub struct CodeReviewPrompt;

impl PromptDefinition for CodeReviewPrompt {
    const NAME: &'static str = "code_review";
    const DESCRIPTION: &'static str = "Ask for a review of a code snippet";

    fn template() -> &'static str {
        r#"Please review the following {{#if language}}{{language}} {{/if}}code:

```{{language}}
{{code}}
```

Please provide a review covering:
- Correctness and potential bugs
- Readability and naming
- Performance considerations
- Suggestions for improvement"#
    }

    fn input_schema() -> Schema {
        Schema::object()
            .required(
                "code",
                Schema::string().min_length(1).describe("The code to review"),
            )
            .optional(
                "language",
                Schema::string().describe("The programming language of the code"),
            )
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_review_prompt_metadata() {
        assert_eq!(CodeReviewPrompt::NAME, "code_review");
        assert!(!CodeReviewPrompt::DESCRIPTION.is_empty());
        assert!(CodeReviewPrompt::input_schema().check().is_ok());
    }
}
