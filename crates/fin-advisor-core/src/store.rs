//! Opaque key/value snapshots owned by the caller.
//!
//! Calculators never persist anything. A caller that wants to remember a
//! profile or a result hands bytes to a [`SnapshotStore`]; the typed helpers
//! below only add a serde_json encoding on top.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{AdvisorError, AdvisorResult};

#[cfg(feature = "health")]
use crate::health::{profile::FinancialProfile, scorer::FinancialHealthResult};

/// Key under which the last scored profile is kept.
pub const PROFILE_SNAPSHOT_KEY: &str = "user_profile";

pub trait SnapshotStore {
    fn get(&self, key: &str) -> AdvisorResult<Option<Vec<u8>>>;
    fn put(&mut self, key: &str, value: Vec<u8>) -> AdvisorResult<()>;
    fn remove(&mut self, key: &str) -> AdvisorResult<()>;
}

/// Process-local store, mainly for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> AdvisorResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> AdvisorResult<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AdvisorResult<()> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> AdvisorResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        if !root.is_dir() {
            return Err(AdvisorError::Storage(format!(
                "Not a directory: {}",
                root.display()
            )));
        }
        Ok(DirectoryStore { root })
    }

    fn path_for(&self, key: &str) -> AdvisorResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SnapshotStore for DirectoryStore {
    fn get(&self, key: &str) -> AdvisorResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> AdvisorResult<()> {
        let path = self.path_for(key)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AdvisorResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serialise `value` as JSON and store it under `key`.
pub fn save_json<T: Serialize>(
    store: &mut impl SnapshotStore,
    key: &str,
    value: &T,
) -> AdvisorResult<()> {
    let bytes = serde_json::to_vec(value)?;
    store.put(key, bytes)
}

/// Load and deserialise the JSON stored under `key`, if any.
pub fn load_json<T: DeserializeOwned>(
    store: &impl SnapshotStore,
    key: &str,
) -> AdvisorResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// A scored profile as the profile screen remembers it.
#[cfg(feature = "health")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub profile: FinancialProfile,
    pub result: FinancialHealthResult,
}

fn validate_key(key: &str) -> AdvisorResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AdvisorError::InvalidArgument {
            field: "key".into(),
            reason: format!("Snapshot key '{key}' must be non-empty [A-Za-z0-9_-]"),
        })
    }
}
