//! Installs the certificate bridges into a script context

use cleanroom_ca::Pem;
use cleanroom_common::LoggingTransformer;
use cleanroom_js::{Extension, ReadOnlyTx, Result, ScriptContext, Value};

use crate::config::ExtensionConfig;
use crate::{endorsed, self_signed};

/// Per-request `cleanroom.crypto` extension
///
/// Borrows the request's read-only transaction, so it cannot outlive the
/// request. Neither bridge reads the transaction today.
pub struct CleanRoomExtension<'tx> {
    tx: &'tx dyn ReadOnlyTx,
    config: ExtensionConfig,
}

impl<'tx> CleanRoomExtension<'tx> {
    /// Extension installing under the default `cleanroom.crypto` namespace
    pub fn new(tx: &'tx dyn ReadOnlyTx) -> Self {
        Self::with_config(tx, ExtensionConfig::default())
    }

    /// Extension installing under the namespaces in `config`
    pub fn with_config(tx: &'tx dyn ReadOnlyTx, config: ExtensionConfig) -> Self {
        Self { tx, config }
    }

    /// Transaction of the request this extension serves
    pub fn tx(&self) -> &'tx dyn ReadOnlyTx {
        self.tx
    }

    /// Namespaces this extension installs under
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }
}

impl Extension for CleanRoomExtension<'_> {
    fn install(&self, ctx: &ScriptContext) -> Result<()> {
        let crypto = ctx.new_object();
        crypto.set(
            self_signed::FUNCTION_NAME,
            ctx.new_native_function(
                self_signed::FUNCTION_NAME,
                self_signed::FUNCTION_LENGTH,
                self_signed::generate_self_signed_cert,
            ),
        );
        crypto.set(
            endorsed::FUNCTION_NAME,
            ctx.new_native_function(
                endorsed::FUNCTION_NAME,
                endorsed::FUNCTION_LENGTH,
                endorsed::generate_endorsed_cert,
            ),
        );

        let namespace =
            ctx.get_or_create_global_property(&self.config.global_namespace, ctx.new_object())?;
        namespace.set(self.config.crypto_namespace.as_str(), crypto);

        LoggingTransformer::log_extension_installed(
            &format!(
                "{}.{}",
                self.config.global_namespace, self.config.crypto_namespace
            ),
            &[self_signed::FUNCTION_NAME, endorsed::FUNCTION_NAME],
        );
        Ok(())
    }
}

/// `{ cert: <pem> }` as returned by both bridges
pub(crate) fn certificate_result(ctx: &ScriptContext, pem: Pem) -> Value {
    let result = ctx.new_object();
    result.set("cert", pem.into_string());
    Value::Object(result)
}
