//! Named JSON blobs for store persistence.
//!
//! Each store is saved under its own key as
//! `{"state": {...}, "version": 0}`. A [`PersistPolicy`] decides which
//! top-level fields are written and which are honored on load. Loading
//! never fails: a missing or unreadable blob yields the default state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{CoreError, StorageError};

pub const PROGRESS_KEY: &str = "achievement-storage";
pub const INTRO_KEY: &str = "intro-storage";
pub const STORAGE_VERSION: u32 = 0;

/// Which fields of a store survive a reload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistPolicy {
    /// Persist nothing; the store starts from defaults every launch.
    None,
    #[default]
    All,
    /// Only the named top-level fields.
    Fields(Vec<String>),
}

impl PersistPolicy {
    /// Keep only the permitted top-level fields of `value`.
    pub fn filter(&self, value: Value) -> Value {
        match (self, value) {
            (PersistPolicy::All, v) => v,
            (PersistPolicy::Fields(keep), Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter(|(k, _)| keep.iter().any(|f| f == k))
                    .collect(),
            ),
            _ => Value::Object(Map::new()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Blob {
    state: Value,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Use `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDirFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// `<data_dir>/storage`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn open_default() -> Result<Self, CoreError> {
        Ok(Self::open(data_dir()?.join("storage"))?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Write the permitted part of `value` under `key`.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn save<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        policy: &PersistPolicy,
    ) -> Result<(), StorageError> {
        let encode = |source| StorageError::EncodeFailed {
            key: key.to_string(),
            source,
        };
        let state = policy.filter(serde_json::to_value(value).map_err(encode)?);
        let blob = Blob {
            state,
            version: STORAGE_VERSION,
        };
        let content = serde_json::to_string_pretty(&blob).map_err(encode)?;

        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        let write_failed = |source| StorageError::WriteFailed {
            path: path.clone(),
            source,
        };
        std::fs::write(&tmp, content).map_err(write_failed)?;
        std::fs::rename(&tmp, &path).map_err(write_failed)?;
        debug!(key, path = %path.display(), "store persisted");
        Ok(())
    }

    /// Read `key`, keeping only fields the policy permits and filling the
    /// rest from `T::default()`.
    pub fn load<T>(&self, key: &str, policy: &PersistPolicy) -> T
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let path = self.path(key);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "no persisted state");
                return T::default();
            }
            Err(e) => {
                warn!(key, error = %e, "unreadable persisted state, using defaults");
                return T::default();
            }
        };

        let blob: Blob = match serde_json::from_str(&content) {
            Ok(b) => b,
            Err(e) => {
                warn!(key, error = %e, "corrupt persisted state, using defaults");
                return T::default();
            }
        };
        if blob.version != STORAGE_VERSION {
            warn!(key, version = blob.version, "unknown storage version, using defaults");
            return T::default();
        }

        let mut merged = match serde_json::to_value(T::default()) {
            Ok(Value::Object(map)) => map,
            _ => return T::default(),
        };
        if let Value::Object(saved) = policy.filter(blob.state) {
            merged.extend(saved);
        }
        serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
            warn!(key, error = %e, "persisted state does not match, using defaults");
            T::default()
        })
    }

    /// Delete `key`. Missing blobs are fine.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::WriteFailed { path, source }),
        }
    }
}
