//! services/intake/src/adapters/file_store.rs
//!
//! This module contains the local storage adapter, the concrete implementation of
//! the `KeyValueStore` port. Each key is kept as one JSON file in the data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use symptom_guide_core::{KeyValueStore, PortError, PortResult};
use tracing::debug;

/// A key-value store backed by `<dir>/<key>.json` files.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && !key.starts_with('.');
        if !valid {
            return Err(PortError::Unexpected(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            PortError::Unexpected(format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        // Stage next to the target, then rename into place.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)
            .and_then(|_| fs::rename(&staging, &path))
            .map_err(|e| PortError::Unexpected(format!("cannot write {}: {}", path.display(), e)))?;
        debug!("Stored key '{}' ({} bytes).", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "cannot remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use symptom_guide_core::local_state::HISTORY_KEY;
    use symptom_guide_core::LocalState;

    #[test]
    fn set_get_remove_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(tmp.path().join("data"));

        assert_eq!(store.get("symptom_guide.theme").unwrap(), None);
        store.set("symptom_guide.theme", "dark").unwrap();
        assert_eq!(
            store.get("symptom_guide.theme").unwrap().as_deref(),
            Some("dark")
        );

        store.remove("symptom_guide.theme").unwrap();
        assert_eq!(store.get("symptom_guide.theme").unwrap(), None);
        // Removing twice is fine.
        store.remove("symptom_guide.theme").unwrap();
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(tmp.path());
        assert!(store.set("../outside", "x").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn clearing_history_deletes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(tmp.path()));
        store.set(HISTORY_KEY, "[]").unwrap();
        let history_file = tmp.path().join(format!("{}.json", HISTORY_KEY));
        assert!(history_file.exists());

        let mut state = LocalState::load(store.clone()).unwrap();
        state.clear_history().unwrap();
        assert!(!history_file.exists());
    }
}
