//! Prompt templates module.
//!
//! A [`PromptTemplate`] pairs a template string with the [`Schema`] its
//! arguments must satisfy. Argument metadata for `prompts/list` is derived
//! from that schema, so the two cannot drift apart.

use rmcp::model::PromptArgument;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::error::PromptError;
use crate::domains::tools::{Presence, Schema, validate};

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// Object schema for the prompt arguments. Every field must be a string.
    pub input_schema: Schema,

    /// The template string with placeholders.
    pub template: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        input_schema: impl Into<Schema>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            input_schema: input_schema.into(),
            template: template.into(),
        }
    }

    /// Arguments as advertised in `prompts/list`.
    pub fn arguments(&self) -> Vec<PromptArgument> {
        let Schema::Object(object) = &self.input_schema else {
            return Vec::new();
        };
        object
            .fields
            .iter()
            .map(|field| PromptArgument {
                name: field.name.clone(),
                title: None,
                description: field.schema.description().map(str::to_string),
                required: Some(matches!(field.presence, Presence::Required)),
            })
            .collect()
    }

    /// Validate raw arguments and render the template.
    pub fn instantiate(&self, arguments: Option<Map<String, Value>>) -> Result<String, PromptError> {
        let raw = Value::Object(arguments.unwrap_or_default());
        let input = validate(&self.input_schema, &raw)?;

        let values: HashMap<String, String> = input
            .as_value()
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        self.render(&values)
    }

    /// Render the template with the given arguments.
    ///
    /// - `{{variable}}` is replaced with the value of `variable`, or removed when unset
    /// - `{{#if variable}}content{{/if}}` includes content only if variable is non-empty
    /// - `{{#if variable}}content{{else}}alternative{{/if}}` with else support
    ///
    /// Substituted values are never rescanned, so argument text containing
    /// braces passes through unchanged.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let resolved = Self::process_conditionals(&self.template, arguments)?;

        let mut out = String::with_capacity(resolved.len());
        let mut rest = resolved.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| PromptError::template("Unclosed placeholder"))?;
            let key = after[..end].trim();
            if let Some(value) = arguments.get(key) {
                out.push_str(value);
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Resolve `{{#if}}` blocks; blocks do not nest.
    fn process_conditionals(
        template: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<String, PromptError> {
        const ENDIF: &str = "{{/if}}";
        const ELSE: &str = "{{else}}";

        let mut result = template.to_string();
        while let Some(if_start) = result.find("{{#if ") {
            let var_end = result[if_start..]
                .find("}}")
                .map(|p| if_start + p)
                .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
            let var_name = result[if_start + 6..var_end].trim();

            let endif_pos = result[var_end..]
                .find(ENDIF)
                .map(|p| var_end + p)
                .ok_or_else(|| PromptError::template("Missing {{/if}} tag"))?;

            let block = &result[var_end + 2..endif_pos];
            let (when_set, when_unset) = match block.find(ELSE) {
                Some(else_pos) => (&block[..else_pos], &block[else_pos + ELSE.len()..]),
                None => (block, ""),
            };

            let is_set = arguments.get(var_name).is_some_and(|v| !v.is_empty());
            let replacement = if is_set { when_set } else { when_unset };

            result = format!(
                "{}{}{}",
                &result[..if_start],
                replacement,
                &result[endif_pos + ENDIF.len()..]
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(text: &str) -> PromptTemplate {
        PromptTemplate::new(
            "test",
            None,
            Schema::object()
                .required("name", Schema::string().min_length(1).describe("Who"))
                .optional("style", Schema::string()),
            text,
        )
    }

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let result = template("Hello, {{name}}!")
            .render(&args(&[("name", "World")]))
            .unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_conditionals() {
        let t = template("Hello{{#if style}}, {{style}}{{else}} plainly{{/if}}!");
        assert_eq!(t.render(&args(&[("style", "warmly")])).unwrap(), "Hello, warmly!");
        assert_eq!(t.render(&args(&[])).unwrap(), "Hello plainly!");
    }

    #[test]
    fn test_unset_placeholder_is_removed() {
        let result = template("```{{style}}\nx\n```").render(&args(&[])).unwrap();
        assert_eq!(result, "```\nx\n```");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let result = template("{{name}}")
            .render(&args(&[("name", "fn f() { {{x}} }")]))
            .unwrap();
        assert_eq!(result, "fn f() { {{x}} }");
    }

    #[test]
    fn test_unclosed_tags() {
        assert!(template("{{#if name} oops").render(&args(&[])).is_err());
        assert!(template("{{#if name}}never closed").render(&args(&[])).is_err());
    }

    #[test]
    fn test_arguments_follow_schema() {
        let arguments = template("").arguments();
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[0].name, "name");
        assert_eq!(arguments[0].required, Some(true));
        assert_eq!(arguments[0].description.as_deref(), Some("Who"));
        assert_eq!(arguments[1].required, Some(false));
    }

    #[test]
    fn test_instantiate_validates() {
        let t = template("Hi {{name}}");
        let err = t.instantiate(None).unwrap_err();
        assert!(matches!(err, PromptError::InvalidArguments(ref f) if f.is_missing()));

        let map = json!({"name": "Ada"}).as_object().cloned();
        assert_eq!(t.instantiate(map).unwrap(), "Hi Ada");
    }
}
