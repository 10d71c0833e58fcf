//! Key-value preference backends.
//!
//! # Responsibilities
//! - Hold opaque string values under string keys
//! - Make every write durable before returning
//!
//! # Design Decisions
//! - The record store only needs `get` and `set_many`
//! - `set_many` is one write for the file backend, so a collection and its
//!   id counter are persisted together
//! - A failed file write leaves the in-memory view untouched

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Error raised by a preference backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Get/set-by-key storage used by the record store.
pub trait PreferenceStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Write several entries as one unit.
    fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), BackendError>;

    /// Write a single entry.
    fn set(&self, key: &str, value: String) -> Result<(), BackendError> {
        self.set_many(vec![(key.to_string(), value)])
    }
}

/// Process-local backend. Contents are lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), BackendError> {
        for (key, value) in entries {
            self.inner.insert(key, value);
        }
        Ok(())
    }
}

/// Backend persisted as a single JSON object on disk.
///
/// The whole map is kept in memory and rewritten through a temporary file
/// plus rename on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the file at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Preference file opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), BackendError> {
        let mut current = self.entries.lock();
        let mut next = current.clone();
        next.extend(entries);

        if let Err(e) = self.flush(&next) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist preferences");
            return Err(e);
        }

        *current = next;
        Ok(())
    }
}
