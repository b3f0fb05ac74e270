//! Extension contract between the host and native script bindings

use crate::context::ScriptContext;
use crate::Result;

/// Native capability installed into a script context
///
/// Extensions are created per request and may borrow request state, which
/// is why [`Extensions`] carries a lifetime.
pub trait Extension {
    /// Register this extension's bindings in `ctx`
    ///
    /// # Errors
    ///
    /// Returns the script exception that prevented installation.
    fn install(&self, ctx: &ScriptContext) -> Result<()>;
}

/// Capability table handed from the handler registry to the script runner
pub type Extensions<'tx> = Vec<Box<dyn Extension + 'tx>>;
