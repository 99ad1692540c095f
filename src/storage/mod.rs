//! Durable key-value storage for InterMAX
//!
//! Wraps an embedded `sled` database behind a fault-suppressing facade:
//! every operation catches the underlying store's failure (unopenable
//! path, serialization error, write failure) and degrades to a boolean
//! or default-value result. Callers never see an unhandled storage
//! fault; failures are reported through `tracing` warnings instead.

use crate::error::{IntermaxError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

pub mod keys;

/// Fault-suppressing wrapper over the embedded key-value store
///
/// Values are stored JSON-encoded under string keys. Each `set` is a
/// single atomic encode-and-insert of the whole value followed by a
/// flush; there is no incremental patching.
///
/// Clones share the same underlying database handle, so the store can
/// be handed to several components cheaply.
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
}

impl KvStore {
    /// Open the store at the default application data location
    ///
    /// The location can be overridden with the `INTERMAX_STORE`
    /// environment variable, which makes it easy to point the binary at
    /// a test store or alternate directory without touching the user's
    /// application data dir.
    ///
    /// # Errors
    ///
    /// Returns `IntermaxError::Storage` if no usable store can be
    /// opened, not even a volatile in-memory one.
    pub fn open_default() -> Result<Self> {
        if let Ok(override_path) = std::env::var("INTERMAX_STORE") {
            return Self::open(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "intermax", "intermax")
            .ok_or_else(|| IntermaxError::Storage("Could not determine data directory".into()))?;

        Self::open(proj_dirs.data_dir().join("store"))
    }

    /// Open (or create) the store at the given path
    ///
    /// If the path cannot be opened, the store degrades to a volatile
    /// in-memory database with a reported warning, so the client keeps
    /// working for the current process even when durable storage is
    /// unavailable.
    ///
    /// # Examples
    ///
    /// ```
    /// use intermax::storage::KvStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = KvStore::open(dir.path().join("store")).unwrap();
    /// assert!(store.is_available());
    /// ```
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        match sled::open(&path) {
            Ok(db) => Ok(Self { db }),
            Err(e) => {
                tracing::warn!(
                    "Durable store at {} unavailable ({}); falling back to in-memory storage",
                    path.display(),
                    e
                );
                let db = sled::Config::new()
                    .temporary(true)
                    .open()
                    .map_err(|e| IntermaxError::Storage(format!("Failed to open store: {}", e)))?;
                Ok(Self { db })
            }
        }
    }

    /// Store a value under a key, reporting success as a boolean
    ///
    /// The value is JSON-encoded and written in one insert. Failures
    /// are swallowed and logged; the caller only sees `false`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to encode value for key {}: {}", key, e);
                return false;
            }
        };

        if let Err(e) = self.db.insert(key.as_bytes(), encoded) {
            tracing::warn!("Failed to write key {}: {}", key, e);
            return false;
        }
        if let Err(e) = self.db.flush() {
            tracing::warn!("Failed to flush store after writing {}: {}", key, e);
            return false;
        }
        true
    }

    /// Read a value, substituting `default` when absent or malformed
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Read a value, returning `None` when absent or malformed
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_typed(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding unreadable record under {}: {}", key, e);
                None
            }
        }
    }

    /// Typed read used internally; decode failures surface as errors
    /// here and are collapsed to `None`/default by the public getters.
    fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let bytes = self
            .db
            .get(key.as_bytes())
            .map_err(|e| IntermaxError::Storage(format!("Read of {} failed: {}", key, e)))?;

        match bytes {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    IntermaxError::InvalidData(format!("Malformed record under {}: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove a key, reporting success as a boolean
    ///
    /// Removing an absent key counts as success.
    pub fn remove(&self, key: &str) -> bool {
        if let Err(e) = self.db.remove(key.as_bytes()) {
            tracing::warn!("Failed to remove key {}: {}", key, e);
            return false;
        }
        if let Err(e) = self.db.flush() {
            tracing::warn!("Failed to flush store after removing {}: {}", key, e);
            return false;
        }
        true
    }

    /// Probe whether the store accepts writes
    pub fn is_available(&self) -> bool {
        const PROBE_KEY: &str = "intermax-storage-probe";
        self.db.insert(PROBE_KEY, b"ok".to_vec()).is_ok()
            && self.db.remove(PROBE_KEY).is_ok()
    }

    /// List every key currently in the store
    ///
    /// Used by the admin aggregator to enumerate both the current and
    /// legacy namespaces. Keys that are not valid UTF-8 are skipped.
    pub fn keys(&self) -> Vec<String> {
        self.db
            .iter()
            .keys()
            .filter_map(|k| k.ok())
            .filter_map(|k| String::from_utf8(k.to_vec()).ok())
            .collect()
    }

    /// Read the raw encoded text stored under a key
    ///
    /// Returns `None` when the key is absent or the payload is not
    /// valid UTF-8.
    pub fn raw(&self, key: &str) -> Option<String> {
        match self.db.get(key.as_bytes()) {
            Ok(Some(bytes)) => String::from_utf8(bytes.to_vec()).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read raw value for {}: {}", key, e);
                None
            }
        }
    }
}
