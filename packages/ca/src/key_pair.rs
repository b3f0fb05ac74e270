//! Key pair parsing

use std::fmt;

use crate::{CaError, Result};

/// Signing key pair parsed from a PKCS#8 PEM private key
pub struct KeyPair {
    pub(crate) inner: rcgen::KeyPair,
}

impl KeyPair {
    /// PEM-encoded SubjectPublicKeyInfo of this key pair
    #[must_use]
    pub fn public_key_pem(&self) -> String {
        self.inner.public_key_pem()
    }

    /// Signature algorithm selected for this key
    #[must_use]
    pub fn algorithm(&self) -> String {
        format!("{:?}", self.inner.algorithm())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Parse a PEM private key into a key pair
///
/// The caller keeps ownership of `pem` and is responsible for wiping it.
///
/// # Errors
///
/// Returns [`CaError::InvalidPrivateKey`] when the PEM framing is broken or the
/// key algorithm is unsupported.
pub fn make_key_pair(pem: &str) -> Result<KeyPair> {
    let inner = rcgen::KeyPair::from_pem(pem)
        .map_err(|e| CaError::InvalidPrivateKey(e.to_string()))?;
    Ok(KeyPair { inner })
}
