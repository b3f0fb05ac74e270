//! Application handler registry

use cleanroom_js::{EndpointContext, EndpointRegistry, Extension, Extensions, NodeContext};
use tracing::{debug, info};

use crate::config::ExtensionConfig;
use crate::installer::CleanRoomExtension;

/// Handler registry of the clean-room governance application
///
/// Every request gets exactly one [`CleanRoomExtension`] bound to that
/// request's transaction.
#[derive(Debug, Clone, Default)]
pub struct CleanRoomHandlers {
    config: ExtensionConfig,
}

impl CleanRoomHandlers {
    /// Registry using the default namespaces
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose extensions install under the namespaces in `config`
    #[must_use]
    pub fn with_config(config: ExtensionConfig) -> Self {
        Self { config }
    }
}

impl EndpointRegistry for CleanRoomHandlers {
    fn get_extensions<'tx>(&self, ctx: &EndpointContext<'tx>) -> Extensions<'tx> {
        debug!("Providing {} extension for request", self.config.function_path("*"));
        let extension: Box<dyn Extension + 'tx> =
            Box::new(CleanRoomExtension::with_config(ctx.tx, self.config.clone()));
        vec![extension]
    }
}

/// Application entry point: build the handler registry for this node
#[must_use]
pub fn make_user_endpoints(node_context: &NodeContext) -> Box<dyn EndpointRegistry> {
    info!("Creating clean-room handlers on node {}", node_context.node_id);
    Box::new(CleanRoomHandlers::new())
}
