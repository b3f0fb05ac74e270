//! Common infrastructure shared by the clean room governance crates
//!
//! This crate provides:
//! - Structured logging initialisation on top of `env_logger`
//! - Secure fingerprinting of sensitive values for log correlation
//! - A zeroizing guard for transient key material

pub mod logging;
pub mod sensitive;

pub use logging::LoggingTransformer;
pub use sensitive::SensitiveString;
