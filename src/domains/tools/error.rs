//! Tool-specific error types.

use thiserror::Error;

use super::content::ContentEnvelope;
use super::validator::ValidationFailure;

/// Failures raised while a handler is running.
///
/// Handlers fold these into an `Error: ...` text envelope themselves, so a
/// client sees them as ordinary tool output rather than a protocol error.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A failure the tool reports in its own terms (division by zero, bad timezone).
    #[error("{0}")]
    Domain(String),

    /// The upstream provider answered with a non-success status.
    #[error("{provider} request failed with status {status}")]
    UpstreamStatus { provider: &'static str, status: u16 },

    /// The upstream provider could not be reached or returned an unreadable body.
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    /// A required setting, such as an API token, is missing.
    #[error("{0}")]
    Configuration(String),

    /// A provider payload could not be turned into binary image data.
    #[error("Unrecognized payload shape: {0}")]
    UnrecognizedPayloadShape(String),

    /// Validated arguments did not fit the handler's parameter type.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn upstream_status(provider: &'static str, status: u16) -> Self {
        Self::UpstreamStatus { provider, status }
    }

    pub fn upstream(provider: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            provider,
            message: err.to_string(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unrecognized_payload(msg: impl Into<String>) -> Self {
        Self::UnrecognizedPayloadShape(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Render as the single-text failure envelope.
    pub fn into_envelope(self) -> ContentEnvelope {
        ContentEnvelope::error(self)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

/// Reasons an invocation never produced handler output.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid arguments for tool '{tool_name}': {failure}")]
    Validation {
        tool_name: String,
        failure: ValidationFailure,
    },

    /// The handler returned an error or panicked.
    #[error("Tool '{tool_name}' failed: {cause}")]
    HandlerFailure { tool_name: String, cause: String },
}

impl DispatchError {
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool { tool_name }
            | Self::Validation { tool_name, .. }
            | Self::HandlerFailure { tool_name, .. } => tool_name,
        }
    }

    pub fn into_envelope(self) -> ContentEnvelope {
        ContentEnvelope::error(self)
    }
}

/// Errors raised while assembling the tool registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("Invalid {which} schema for tool '{tool}': {reason}")]
    InvalidSchema {
        tool: String,
        which: &'static str,
        reason: String,
    },
}
