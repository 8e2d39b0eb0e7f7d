//! History Store - bounded ledger of past analyses
//!
//! Flow:
//! 1. `load` reads the persisted slot; absent or corrupt data is an empty ledger
//! 2. `append` stamps a new entry, prepends it, evicts past capacity
//! 3. The whole ledger is written back before `append` returns
//!
//! There is no clear operation; capacity eviction is the only removal.

mod storage;
mod types;


pub use storage::{FileStorage, LedgerStorage, MemoryStorage, StorageError};
pub use types::{EntrySummary, HistoryEntry, HistoryLedger};

use chrono::Utc;

use crate::constants::HISTORY_CAPACITY;
use crate::logic::normalize::NormalizedResult;

pub struct HistoryStore<S> {
    storage: S,
    capacity: usize,
}

impl<S: LedgerStorage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            capacity: HISTORY_CAPACITY,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read the persisted ledger. Never fails.
    pub fn load(&self) -> HistoryLedger {
        match self.storage.load() {
            Ok(Some(text)) => HistoryLedger::decode(&text, self.capacity),
            Ok(None) => HistoryLedger::default(),
            Err(e) => {
                log::warn!("Failed to read history ledger: {}", e);
                HistoryLedger::default()
            }
        }
    }

    /// Record a completed analysis and persist the updated ledger
    pub fn append(&self, result: NormalizedResult) -> HistoryLedger {
        let mut ledger = self.load();

        let now = Utc::now();
        let id = ledger.next_id(now.timestamp_millis());
        let entry = HistoryEntry::new(id, now, result);
        let file_name = entry.summary.file_name.clone();

        let evicted = ledger.push_front(entry, self.capacity);
        for old in &evicted {
            log::debug!("Evicted history entry {} ({})", old.id, old.summary.file_name);
        }

        if let Err(e) = self.persist(&ledger) {
            log::error!("Failed to save history ledger: {}", e);
        } else {
            log::info!("History entry {} recorded for {} ({} total)", id, file_name, ledger.len());
        }

        ledger
    }

    /// Look up a past entry for re-display
    pub fn find_by_id(&self, id: i64) -> Option<HistoryEntry> {
        self.load().find(id).cloned()
    }

    fn persist(&self, ledger: &HistoryLedger) -> Result<(), StorageError> {
        let text = ledger.encode()?;
        self.storage.save(&text)
    }
}
