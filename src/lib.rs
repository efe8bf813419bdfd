//! Toolkit MCP server library.
//!
//! A Model Context Protocol server exposing six tools (greeting, arithmetic,
//! current time, geocoding, weather forecast and text-to-image), one
//! server-info resource and one code review prompt.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the rmcp server handler and transports
//! - **domains**: protocol-facing features
//!   - **tools**: schemas, argument validation, the tool registry and dispatcher
//!   - **resources**: readable resources
//!   - **prompts**: prompt templates
//! - **clients**: HTTP clients for the geocoding, weather and image providers
//!
//! # Example
//!
//! ```rust,no_run
//! use toolkit_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::new(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
