//! Endpoint registry contract used by the host to collect extensions

use crate::extension::Extensions;
use crate::kv::ReadOnlyTx;

/// Node-level state available when the application builds its registry
#[derive(Debug, Clone, Default)]
pub struct NodeContext {
    /// Identifier of the hosting node
    pub node_id: String,
}

impl NodeContext {
    /// Context for node `node_id`
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
        }
    }
}

/// Per-request state handed to the registry
pub struct EndpointContext<'tx> {
    /// Read-only transaction of the current request
    pub tx: &'tx dyn ReadOnlyTx,
}

impl<'tx> EndpointContext<'tx> {
    /// Context for a request running under `tx`
    pub fn new(tx: &'tx dyn ReadOnlyTx) -> Self {
        Self { tx }
    }
}

/// Application handler registry
pub trait EndpointRegistry {
    /// Extensions to install for the request described by `ctx`
    fn get_extensions<'tx>(&self, ctx: &EndpointContext<'tx>) -> Extensions<'tx>;
}
