//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call by name with a JSON
//! argument object. Every call goes through the same pipeline: the registry
//! resolves the name, the validator checks the arguments against the tool's
//! input schema and applies defaults, and the handler produces a
//! [`ContentEnvelope`].
//!
//! ## Architecture
//!
//! - `schema.rs` - Declarative input/output schemas
//! - `validator.rs` - Schema validation and argument normalization
//! - `content.rs` - The content envelope returned by every tool
//! - `registry.rs` - Tool descriptors, handler trait and the registry
//! - `dispatcher.rs` - Lookup, validate, execute; failures become envelopes
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Implement `ToolHandler` and a `descriptor()` constructor
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `build_registry()`
//!
//! The router and HTTP transport pick it up from the registry.

mod content;
pub mod definitions;
mod dispatcher;
mod error;
mod registry;
pub mod router;
mod schema;
mod validator;

pub use content::{ContentEnvelope, ContentItem, ImageContent};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, RegistryError, ToolError};
pub use registry::{ToolDescriptor, ToolHandler, ToolRegistry, ToolSummary, build_registry};
pub use router::build_tool_router;
pub use schema::{
    ArraySchema, BooleanSchema, EnumSchema, Field, NumberSchema, ObjectSchema, Presence, Schema,
    StringSchema,
};
pub use validator::{ValidatedInput, ValidationFailure, validate};
