// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Key/value persistence for flags and small values.
//!
//! [`PersistedState`] is the only place that reads or writes these flags. It
//! holds a durable store (kept across launches) and a session store (cleared
//! on exit), both behind [`KeyValueStorage`] so tests can swap them out.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Minimal string key/value store.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and replaced.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk and adopt them only once the write succeeded.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)
    }
}

const FIRST_SESSION_KEY: &str = "firstSession";
const ADMIN_AUTH_KEY: &str = "adminAuthenticated";

/// Persisted flags and values used across the app.
pub struct PersistedState<L: KeyValueStorage, S: KeyValueStorage = MemoryStorage> {
    local: L,
    session: S,
}

impl<L: KeyValueStorage> PersistedState<L> {
    pub fn new(local: L) -> Self {
        Self {
            local,
            session: MemoryStorage::new(),
        }
    }
}

impl<L: KeyValueStorage, S: KeyValueStorage> PersistedState<L, S> {
    pub fn is_flag_set(&self, key: &str) -> bool {
        self.local.get(key).is_some()
    }

    pub fn set_flag(&mut self, key: &str) -> Result<()> {
        self.local.set(key, "true")
    }

    /// True until [`Self::mark_session_seen`] has been called once.
    pub fn is_first_session(&self) -> bool {
        !self.is_flag_set(FIRST_SESSION_KEY)
    }

    pub fn mark_session_seen(&mut self) -> Result<()> {
        self.set_flag(FIRST_SESSION_KEY)
    }

    pub fn is_admin_authenticated(&self) -> bool {
        self.session.get(ADMIN_AUTH_KEY).is_some()
    }

    pub fn set_admin_authenticated(&mut self, authenticated: bool) -> Result<()> {
        if authenticated {
            self.session.set(ADMIN_AUTH_KEY, "true")
        } else {
            self.session.remove(ADMIN_AUTH_KEY)
        }
    }

    /// Read a JSON value from the session store, or `default` if absent or
    /// unreadable.
    pub fn session_value<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.session
            .get(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(default)
    }

    pub fn set_session_value<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.session.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut storage = FileStorage::open(&path);
        storage.set("firstCorrect", "true").unwrap();
        drop(storage);

        let mut reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("firstCorrect").as_deref(), Some("true"));
        reopened.remove("firstCorrect").unwrap();
        assert_eq!(FileStorage::open(&path).get("firstCorrect"), None);
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        // Parent is a regular file, so every write fails
        let mut state = PersistedState::new(FileStorage::open(blocker.join("state.json")));
        assert!(state.set_flag("firstCorrect").is_err());
        assert!(!state.is_flag_set("firstCorrect"));
    }

    #[test]
    fn test_failed_remove_keeps_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut storage = FileStorage::open(&path);
        storage.set("firstCorrect", "true").unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(storage.remove("firstCorrect").is_err());
        assert_eq!(storage.get("firstCorrect").as_deref(), Some("true"));
    }

    #[test]
    fn test_file_storage_recovers_from_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get("anything"), None);
    }

    #[test]
    fn test_first_session_flag() {
        let mut state = PersistedState::new(MemoryStorage::new());
        assert!(state.is_first_session());
        state.mark_session_seen().unwrap();
        assert!(!state.is_first_session());
    }

    #[test]
    fn test_admin_flag_lives_in_session() {
        let mut state = PersistedState::new(MemoryStorage::new());
        state.set_admin_authenticated(true).unwrap();
        assert!(state.is_admin_authenticated());
        assert!(!state.is_flag_set(ADMIN_AUTH_KEY));
        state.set_admin_authenticated(false).unwrap();
        assert!(!state.is_admin_authenticated());
    }

    #[test]
    fn test_session_values() {
        let mut state = PersistedState::new(MemoryStorage::new());
        assert_eq!(state.session_value("tab", 0u32), 0);
        state.set_session_value("tab", &2u32).unwrap();
        assert_eq!(state.session_value("tab", 0u32), 2);
    }
}
