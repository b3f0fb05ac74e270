//! Production-grade structured logging infrastructure
//!
//! Library crates in this workspace emit events through `tracing`, which is
//! built with its `log` feature so every event reaches the `log` facade.
//! This module installs `env_logger` as the sink and provides helpers that
//! keep key material out of log lines.

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Number of hex characters kept from a SHA-256 fingerprint
const FINGERPRINT_HEX_LEN: usize = 12;

/// Production logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at host startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=info` - Enable info and above (recommended for production)
    /// - `RUST_LOG=cleanroom_extensions=debug` - Module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; only the first call installs the logger.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Short SHA-256 fingerprint of a sensitive value
    ///
    /// Returns `#` followed by the first 12 hex characters of the digest, so
    /// the same key can be correlated across log lines without being revealed.
    #[must_use]
    pub fn fingerprint(value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        let hex_digest = hex::encode(digest);
        format!("#{}", &hex_digest[..FINGERPRINT_HEX_LEN])
    }

    /// Log extension installation into a script context
    pub fn log_extension_installed(namespace: &str, functions: &[&str]) {
        debug!(
            "Installed extension namespace {namespace} ({} functions: {})",
            functions.len(),
            functions.join(", ")
        );
    }

    /// Secure logging of cryptographic errors
    ///
    /// Only the operation and the error kind are logged; error messages from
    /// the primitive layer may echo caller input and stay out of the log.
    pub fn log_crypto_error(operation: &str, error_kind: &str) {
        warn!("Cryptographic operation failed: {operation} (error_kind: {error_kind})");
    }
}
