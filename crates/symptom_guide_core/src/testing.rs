//! crates/symptom_guide_core/src/testing.rs
//!
//! Test doubles for the core ports, shared with downstream crates through the
//! `test-util` feature.

use crate::ports::{KeyValueStore, PortResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory `KeyValueStore`.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// The stored value for `key`, bypassing `LocalState`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
