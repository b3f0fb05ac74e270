//! Script exception kinds

use thiserror::Error;

/// Exception raised into script code
///
/// `Display` renders the engine's native `Kind: message` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Wrong value kind or wrong argument count
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Value of the right kind outside the allowed domain
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Failure inside native code that is not the caller's fault
    #[error("InternalError: {0}")]
    InternalError(String),
}

impl ScriptError {
    /// Create a `TypeError`
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a `RangeError`
    pub fn range_error(msg: impl Into<String>) -> Self {
        Self::RangeError(msg.into())
    }

    /// Create an `InternalError`
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Constructor name as seen by scripts
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TypeError(_) => "TypeError",
            Self::RangeError(_) => "RangeError",
            Self::InternalError(_) => "InternalError",
        }
    }

    /// Message without the kind prefix
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::TypeError(msg) | Self::RangeError(msg) | Self::InternalError(msg) => msg,
        }
    }
}

/// Result type for script-facing operations
pub type Result<T> = std::result::Result<T, ScriptError>;
