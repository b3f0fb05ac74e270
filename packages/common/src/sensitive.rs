//! Zeroizing wrapper for transient secret strings

use std::fmt;

use zeroize::Zeroizing;

use crate::LoggingTransformer;

/// Secret text (typically a PEM private key) that is wiped when dropped.
///
/// The backing buffer is overwritten with zeros on every exit path that drops
/// the guard, including early returns and unwinding. `Debug` never prints the
/// contents.
pub struct SensitiveString(Zeroizing<String>);

impl SensitiveString {
    /// Take ownership of `value`; its buffer is wiped on drop
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Borrow the secret for the duration of a primitive call
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Length of the secret in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Log-safe fingerprint of the secret
    #[must_use]
    pub fn fingerprint(&self) -> String {
        LoggingTransformer::fingerprint(self.expose())
    }
}

impl From<String> for SensitiveString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Zeroizing<String>> for SensitiveString {
    fn from(value: Zeroizing<String>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensitiveString(<{} bytes redacted>)", self.len())
    }
}
