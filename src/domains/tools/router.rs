//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered tool gets one dynamic route that forwards its arguments
//! to the shared [`Dispatcher`], so validation and error folding happen in one
//! place for every transport.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::CallToolResult,
};
use serde_json::Value;

use super::dispatcher::Dispatcher;
use super::registry::ToolDescriptor;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .descriptors()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(dispatcher.clone(), descriptor))
        })
}

fn create_route<S>(dispatcher: Arc<Dispatcher>, descriptor: &ToolDescriptor) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name().to_string();
    ToolRoute::new_dyn(descriptor.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let dispatcher = dispatcher.clone();
        let name = name.clone();
        let args = ctx.arguments.clone().unwrap_or_default();
        async move {
            let envelope = dispatcher.invoke(&name, Value::Object(args)).await;
            Ok::<CallToolResult, McpError>(envelope.into_call_tool_result())
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::build_registry;

    struct TestServer {}

    #[test]
    fn test_router_matches_registry() {
        let registry = Arc::new(build_registry(&Config::default()).unwrap());
        let dispatcher = Arc::new(Dispatcher::new(registry.clone()));

        let router: ToolRouter<TestServer> = build_tool_router(dispatcher);
        let tools = router.list_all();
        assert_eq!(tools.len(), registry.len());

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        for name in registry.tool_names() {
            assert!(names.contains(&name), "router is missing {}", name);
        }
    }

    #[test]
    fn test_routes_advertise_output_schema() {
        let registry = Arc::new(build_registry(&Config::default()).unwrap());
        let router: ToolRouter<TestServer> =
            build_tool_router(Arc::new(Dispatcher::new(registry)));
        for tool in router.list_all() {
            assert!(tool.output_schema.is_some(), "{} lacks an output schema", tool.name);
        }
    }
}
