//! In-process storage backend.

use std::cell::RefCell;
use std::collections::HashMap;

use super::Storage;
use crate::error::Result;

/// Storage held in a `HashMap`; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.docs.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.docs.borrow_mut().remove(key);
        Ok(())
    }
}
