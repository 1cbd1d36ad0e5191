//! Key/value document storage.
//!
//! Every collection lives as one JSON document under a fixed key (see
//! [`crate::constants::keys`]). Backends only move strings; typed
//! (de)serialization happens in [`load_json`], [`load_list`] and [`save_json`].

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// A synchronous string key/value store.
///
/// Writes are last-write-wins; there is no locking across processes.
pub trait Storage {
    /// Read the raw document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the document stored under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize the document under `key`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| Error::parse(format!("Invalid JSON under '{key}': {e}"), None))
}

/// Read a list document, falling back to an empty list when the key is
/// missing, unreadable or malformed.
pub fn load_list<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    match load_json::<Vec<T>>(storage, key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to load {key}, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Serialize `value` and store it under `key`.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Msg(format!("Failed to serialize {key}: {e}")))?;
    storage.set(key, &json)
}
