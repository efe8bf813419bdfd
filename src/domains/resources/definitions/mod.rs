//! Resource definitions module.
//!
//! Each resource is defined in its own file with its URI, metadata and a
//! renderer that builds the content from the [`ResourceContext`] at read time.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod server_info;

pub use server_info::ServerInfoResource;

use super::error::ResourceError;
use super::service::ResourceContext;

/// Trait for resource definitions.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Render the current content of this resource.
    fn render(context: &ResourceContext) -> Result<String, ResourceError>;
}
