//! Error handling for certificate authority primitives

use thiserror::Error;

/// Certificate authority errors
///
/// Messages describe what was wrong with an input but never embed key
/// material, so they are safe to forward to script code.
#[derive(Debug, Error)]
pub enum CaError {
    /// Private key PEM could not be parsed into a key pair
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Public key PEM could not be parsed
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Issuer certificate could not be used for signing
    #[error("Invalid issuer certificate: {0}")]
    InvalidIssuerCertificate(String),

    /// Subject name is malformed
    #[error("Invalid subject name: {0}")]
    InvalidSubjectName(String),

    /// Subject alternative name is malformed
    #[error("Invalid subject alternative name: {0}")]
    InvalidSubjectAltName(String),

    /// Time string is not a valid X.509 time
    #[error("Invalid time string: {0}")]
    InvalidTime(String),

    /// Validity window is empty or out of range
    #[error("Invalid validity period: {0}")]
    InvalidValidity(String),

    /// CA path length constraint does not fit the basic constraints extension
    #[error("Invalid CA path length constraint {0}: must be between 0 and 255")]
    InvalidPathLength(i32),

    /// Certificate serialization or signing failed
    #[error("Certificate generation failed: {0}")]
    Generation(String),
}

impl CaError {
    /// Stable, input-free name of the error variant for log lines
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPrivateKey(_) => "invalid_private_key",
            Self::InvalidPublicKey(_) => "invalid_public_key",
            Self::InvalidIssuerCertificate(_) => "invalid_issuer_certificate",
            Self::InvalidSubjectName(_) => "invalid_subject_name",
            Self::InvalidSubjectAltName(_) => "invalid_subject_alt_name",
            Self::InvalidTime(_) => "invalid_time",
            Self::InvalidValidity(_) => "invalid_validity",
            Self::InvalidPathLength(_) => "invalid_path_length",
            Self::Generation(_) => "generation",
        }
    }
}

impl From<rcgen::Error> for CaError {
    fn from(err: rcgen::Error) -> Self {
        CaError::Generation(err.to_string())
    }
}

impl From<chrono::ParseError> for CaError {
    fn from(err: chrono::ParseError) -> Self {
        CaError::InvalidTime(err.to_string())
    }
}

/// Result type for certificate authority operations
pub type Result<T> = std::result::Result<T, CaError>;
