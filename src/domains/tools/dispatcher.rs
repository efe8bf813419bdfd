//! Tool invocation pipeline: lookup, validation, execution.
//!
//! [`Dispatcher::invoke`] never fails. Unknown tools, invalid arguments, and
//! handler errors or panics all come back as an `Error: ...` text envelope.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::content::ContentEnvelope;
use super::error::DispatchError;
use super::registry::ToolRegistry;
use super::validator::validate;

pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run the named tool on raw client arguments.
    #[instrument(skip(self, raw))]
    pub async fn invoke(&self, name: &str, raw: Value) -> ContentEnvelope {
        match self.try_invoke(name, raw).await {
            Ok(envelope) => {
                debug!(items = envelope.items().len(), "Tool completed");
                envelope
            }
            Err(e) => {
                warn!(error = %e, "Tool invocation failed");
                e.into_envelope()
            }
        }
    }

    async fn try_invoke(&self, name: &str, raw: Value) -> Result<ContentEnvelope, DispatchError> {
        let descriptor = self
            .registry
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownTool {
                tool_name: name.to_string(),
            })?;

        let input =
            validate(descriptor.input_schema(), &raw).map_err(|failure| DispatchError::Validation {
                tool_name: name.to_string(),
                failure,
            })?;

        let outcome = AssertUnwindSafe(descriptor.handler().call(input))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(envelope)) => Ok(envelope),
            Ok(Err(e)) => Err(DispatchError::HandlerFailure {
                tool_name: name.to_string(),
                cause: e.to_string(),
            }),
            Err(panic) => Err(DispatchError::HandlerFailure {
                tool_name: name.to_string(),
                cause: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{Schema, ToolDescriptor, ToolError, ToolHandler, ValidatedInput};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTool(Arc<AtomicUsize>);

    #[async_trait]
    impl ToolHandler for CountingTool {
        async fn call(&self, input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ContentEnvelope::text(format!(
                "count={}",
                input.as_value()["count"]
            )))
        }
    }

    struct PanickingTool;

    #[async_trait]
    impl ToolHandler for PanickingTool {
        async fn call(&self, _input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
            panic!("kaboom");
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        async fn call(&self, _input: ValidatedInput) -> Result<ContentEnvelope, ToolError> {
            Err(ToolError::internal("disk on fire"))
        }
    }

    fn dispatcher(calls: Arc<AtomicUsize>) -> Dispatcher {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::new(
                "count",
                "Counts calls",
                Schema::object().optional_with_default("count", Schema::integer().min(0.0), 1),
                Schema::object(),
                CountingTool(calls),
            ))
            .unwrap();
        registry
            .register(ToolDescriptor::new(
                "panic",
                "Always panics",
                Schema::object(),
                Schema::object(),
                PanickingTool,
            ))
            .unwrap();
        registry
            .register(ToolDescriptor::new(
                "fail",
                "Always fails",
                Schema::object(),
                Schema::object(),
                FailingTool,
            ))
            .unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let calls = Arc::new(AtomicUsize::new(0));
        let envelope = dispatcher(calls.clone()).invoke("nope", json!({})).await;
        assert_eq!(envelope.first_text(), Some("Error: Unknown tool: nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_skip_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let envelope = dispatcher(calls.clone())
            .invoke("count", json!({"count": -1}))
            .await;
        let text = envelope.first_text().unwrap();
        assert!(text.starts_with("Error: Invalid arguments for tool 'count'"));
        assert!(text.contains("'count'"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_defaults_reach_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let envelope = dispatcher(calls.clone()).invoke("count", json!({})).await;
        assert_eq!(envelope.first_text(), Some("count=1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let calls = Arc::new(AtomicUsize::new(0));
        let envelope = dispatcher(calls).invoke("panic", json!({})).await;
        assert_eq!(
            envelope.first_text(),
            Some("Error: Tool 'panic' failed: panicked: kaboom")
        );
    }

    #[tokio::test]
    async fn test_handler_error_becomes_envelope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let envelope = dispatcher(calls).invoke("fail", json!({})).await;
        assert_eq!(
            envelope.first_text(),
            Some("Error: Tool 'fail' failed: Internal error: disk on fire")
        );
    }
}
