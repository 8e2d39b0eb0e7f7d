use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logic::normalize::NormalizedResult;

// ============================================================================
// HISTORY ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub file_name: String,
    pub final_probability: f64,
}

impl EntrySummary {
    pub fn of(result: &NormalizedResult) -> Self {
        Self {
            file_name: result.file_name.clone(),
            final_probability: result.final_probability,
        }
    }
}

/// One past analysis. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Millisecond timestamp, strictly increasing across the ledger
    pub id: i64,
    pub captured_at: DateTime<Utc>,
    pub summary: EntrySummary,
    pub result: NormalizedResult,
}

impl HistoryEntry {
    pub fn new(id: i64, captured_at: DateTime<Utc>, result: NormalizedResult) -> Self {
        Self {
            id,
            captured_at,
            summary: EntrySummary::of(&result),
            result,
        }
    }
}

/// On-disk shape. Unknown fields are ignored and a missing timestamp is
/// rebuilt from the id. The stored summary is never read back: it is
/// derived from the normalized result so it cannot disagree with it.
/// Ledgers written by the web client keep the raw payload under `data`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: i64,
    #[serde(default)]
    captured_at: Option<DateTime<Utc>>,
    #[serde(alias = "data")]
    result: NormalizedResult,
}

impl From<StoredEntry> for HistoryEntry {
    fn from(stored: StoredEntry) -> Self {
        let captured_at = stored
            .captured_at
            .or_else(|| DateTime::from_timestamp_millis(stored.id))
            .unwrap_or_default();
        Self::new(stored.id, captured_at, stored.result)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

/// Bounded ledger of past analyses, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn find(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Next id: the current time unless that would not sort after the head.
    /// A head id with no successor is corrupt and is ignored.
    pub(crate) fn next_id(&self, now_ms: i64) -> i64 {
        match self.latest() {
            Some(head) if head.id >= now_ms => head.id.checked_add(1).unwrap_or(now_ms),
            _ => now_ms,
        }
    }

    /// Prepend and evict the oldest entries beyond `capacity`
    pub(crate) fn push_front(&mut self, entry: HistoryEntry, capacity: usize) -> Vec<HistoryEntry> {
        self.entries.insert(0, entry);
        if self.entries.len() > capacity {
            self.entries.split_off(capacity)
        } else {
            Vec::new()
        }
    }

    pub(crate) fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Tolerant decode of persisted text.
    ///
    /// Anything that is not a JSON array yields an empty ledger. Entries that
    /// cannot be decoded are dropped individually.
    pub(crate) fn decode(text: &str, capacity: usize) -> Self {
        let items = match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                log::warn!("Persisted history is not a list, starting empty");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Persisted history is corrupt ({}), starting empty", e);
                return Self::default();
            }
        };

        let total = items.len();
        let mut entries: Vec<HistoryEntry> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<StoredEntry>(item).ok())
            .map(HistoryEntry::from)
            .collect();

        if entries.len() < total {
            log::warn!("Dropped {} unreadable history entries", total - entries.len());
        }
        entries.truncate(capacity);

        Self { entries }
    }
}

impl<'a> IntoIterator for &'a HistoryLedger {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
