//! Transport layer for the MCP server.
//!
//! - **STDIO**: rmcp over stdin/stdout (default) - feature: `stdio`
//! - **HTTP**: JSON-RPC 2.0 over POST requests - feature: `http`
//!
//! Both transports hand every message to [`McpServer`](crate::core::McpServer),
//! so tool calls always go through the same dispatcher.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
