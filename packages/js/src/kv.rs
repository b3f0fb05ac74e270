//! Read-only view of the transactional key-value store

use std::collections::HashMap;

/// Read access to the current transaction
pub trait ReadOnlyTx {
    /// Value stored under `key` in `map`
    fn get(&self, map: &str, key: &[u8]) -> Option<Vec<u8>>;

    /// Whether `key` exists in `map`
    fn has(&self, map: &str, key: &[u8]) -> bool {
        self.get(map, key).is_some()
    }
}

/// In-memory transaction snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryReadOnlyTx {
    maps: HashMap<String, HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryReadOnlyTx {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with_entry(
        mut self,
        map: impl Into<String>,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.maps
            .entry(map.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

impl ReadOnlyTx for InMemoryReadOnlyTx {
    fn get(&self, map: &str, key: &[u8]) -> Option<Vec<u8>> {
        self.maps.get(map).and_then(|m| m.get(key)).cloned()
    }
}
