//! Storage port for the history ledger.
//!
//! The ledger lives in a single named slot and is always replaced whole.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::constants;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable slot holding the serialized ledger
pub trait LedgerStorage: Send + Sync {
    /// Current contents, `None` when nothing was ever saved
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the slot contents; must be durable on return
    fn save(&self, contents: &str) -> Result<(), StorageError>;
}

impl<T: LedgerStorage + ?Sized> LedgerStorage for Arc<T> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, contents: &str) -> Result<(), StorageError> {
        (**self).save(contents)
    }
}

// ============================================================================
// FILE STORAGE
// ============================================================================

/// JSON file in the local data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<local data dir>/ScholarScan/scanHistory.json` unless overridden
    pub fn default_location() -> Self {
        Self::new(constants::get_history_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| constants::HISTORY_SLOT.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Readers see either the old or the new ledger, never a mix
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

// ============================================================================
// MEMORY STORAGE
// ============================================================================

/// In-process slot, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, contents: &str) -> Result<(), StorageError> {
        *self.slot.lock() = Some(contents.to_string());
        Ok(())
    }
}
