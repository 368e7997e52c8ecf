// SocLookup - core/store.rs
//
// Persistence port: an opaque key/value store of byte blobs.
//
// The catalog and history only see this trait. Reads never fail loudly:
// a missing or unreadable value is `None` and the caller falls back to its
// compiled-in default. Writes are best-effort; a failed save is logged and
// the in-memory state stays authoritative for the running process.

use crate::util::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Opaque key/value persistence supplied by the host environment.
pub trait KeyValueStore: Send + Sync {
    /// Return the bytes stored under `key`, or `None` if absent or unreadable.
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Load and deserialise a JSON value. Malformed data is logged and
/// treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let bytes = store.load(key)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| {
            tracing::warn!(key, error = %e, "Stored value is malformed; using defaults");
        })
        .ok()
}

/// Serialise and save a JSON value, logging (not propagating) failures.
///
/// Returns `true` if the value was written.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_vec(value)
        .map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })
        .and_then(|bytes| store.save(key, &bytes));

    match result {
        Ok(()) => {
            tracing::trace!(key, "Value persisted");
            true
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to persist value; keeping in-memory state");
            false
        }
    }
}

/// Process-local store. Used by tests and by callers that do not want
/// anything written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.get(key).cloned()
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still usable.
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
