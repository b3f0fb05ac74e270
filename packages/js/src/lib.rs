//! Scripting engine boundary for governance extensions
//!
//! Scripts hand native code loosely typed values. This crate gives them a
//! tagged representation ([`Value`]), the engine's coercion rules, the
//! engine's exception kinds ([`ScriptError`]), a single-threaded
//! [`ScriptContext`] with a global object, and the contracts a host uses to
//! install per-request [`Extension`]s.

pub mod context;
pub mod endpoints;
pub mod error;
pub mod extension;
pub mod kv;
pub mod value;

pub use context::ScriptContext;
pub use endpoints::{EndpointContext, EndpointRegistry, NodeContext};
pub use error::{Result, ScriptError};
pub use extension::{Extension, Extensions};
pub use kv::{InMemoryReadOnlyTx, ReadOnlyTx};
pub use value::{JsString, NativeFn, NativeFunction, Object, Value};
