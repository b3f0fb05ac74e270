//! Extension configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_GLOBAL_NAMESPACE: &str = "cleanroom";
const DEFAULT_CRYPTO_NAMESPACE: &str = "crypto";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid JSON for [`ExtensionConfig`]
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A namespace is not a usable property name
    #[error("Invalid {field}: {reason}")]
    InvalidNamespace {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the extension installs its functions
///
/// The defaults install `cleanroom.crypto`. Missing JSON fields fall back to
/// the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Global object holding the extension namespace
    pub global_namespace: String,
    /// Property of the global object holding the bridges
    pub crypto_namespace: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            global_namespace: DEFAULT_GLOBAL_NAMESPACE.to_string(),
            crypto_namespace: DEFAULT_CRYPTO_NAMESPACE.to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    ///
    /// Malformed JSON, unknown fields or invalid namespaces.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Unreadable file or any error [`ExtensionConfig::from_json_str`] returns.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check that both namespaces are plain property names
    ///
    /// # Errors
    ///
    /// An empty namespace, or one containing `.` or whitespace.
    pub fn validate(&self) -> Result<()> {
        validate_namespace("global_namespace", &self.global_namespace)?;
        validate_namespace("crypto_namespace", &self.crypto_namespace)
    }

    /// Dotted path of a bridge, e.g. `cleanroom.crypto.generateSelfSignedCert`
    #[must_use]
    pub fn function_path(&self, function: &str) -> String {
        format!(
            "{}.{}.{function}",
            self.global_namespace, self.crypto_namespace
        )
    }
}

fn validate_namespace(field: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains('.') {
        "must not contain '.'"
    } else if value.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidNamespace {
        field,
        reason: reason.to_string(),
    })
}
