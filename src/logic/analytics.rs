//! Analytics Aggregator - dashboard statistics derived from the ledger
//!
//! Pure functions; computed on demand, nothing cached.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::history::HistoryLedger;

/// Entries charted in the trend series
pub const SERIES_LENGTH: usize = 10;

/// Rows above this final probability are flagged on the dashboard
pub const ELEVATED_RISK: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub value_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub id: i64,
    pub file_name: String,
    pub captured_at: DateTime<Utc>,
    pub risk_percent: u32,
    pub elevated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub count: usize,
    pub mean_final_probability: f64,
    /// Oldest first
    pub series: Vec<SeriesPoint>,
    /// Newest first, one per ledger entry
    pub rows: Vec<ActivityRow>,
}

pub fn summarize(ledger: &HistoryLedger) -> ActivitySummary {
    let count = ledger.len();

    let mean_final_probability = if count == 0 {
        0.0
    } else {
        ledger
            .iter()
            .map(|entry| entry.summary.final_probability)
            .sum::<f64>()
            / count as f64
    };

    // ledger is newest first; the chart reads left to right in time
    let series = ledger
        .iter()
        .take(SERIES_LENGTH)
        .rev()
        .enumerate()
        .map(|(i, entry)| SeriesPoint {
            label: format!("Scan {}", i + 1),
            value_percent: entry.summary.final_probability * 100.0,
        })
        .collect();

    let rows = ledger
        .iter()
        .map(|entry| ActivityRow {
            id: entry.id,
            file_name: entry.summary.file_name.clone(),
            captured_at: entry.captured_at,
            risk_percent: (entry.summary.final_probability * 100.0).round() as u32,
            elevated: entry.summary.final_probability > ELEVATED_RISK,
        })
        .collect();

    ActivitySummary {
        count,
        mean_final_probability,
        series,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::history::{HistoryStore, MemoryStorage};
    use crate::logic::normalize::normalize;
    use serde_json::json;

    fn ledger_of(finals: &[f64]) -> HistoryLedger {
        let store = HistoryStore::new(MemoryStorage::new());
        let mut ledger = HistoryLedger::default();
        for (i, value) in finals.iter().enumerate() {
            ledger = store.append(normalize(&json!({
                "file": format!("doc-{}.pdf", i),
                "scores": {"final": {"final_probability": value, "decision": "Accept"}}
            })));
        }
        ledger
    }

    #[test]
    fn test_empty_ledger() {
        let summary = summarize(&HistoryLedger::default());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_final_probability, 0.0);
        assert!(summary.series.is_empty());
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn test_series_is_chronological() {
        let ledger = ledger_of(&[0.1, 0.2, 0.6]);
        let summary = summarize(&ledger);

        assert_eq!(summary.count, 3);
        assert!((summary.mean_final_probability - 0.3).abs() < 1e-9);

        let labels: Vec<&str> = summary.series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Scan 1", "Scan 2", "Scan 3"]);
        assert!((summary.series[0].value_percent - 10.0).abs() < 1e-9);
        assert!((summary.series[2].value_percent - 60.0).abs() < 1e-9);

        // rows keep ledger order
        assert_eq!(summary.rows[0].file_name, "doc-2.pdf");
        assert!(summary.rows[0].elevated);
        assert_eq!(summary.rows[0].risk_percent, 60);
        assert!(!summary.rows[2].elevated);
    }

    #[test]
    fn test_full_ledger_series_bounded() {
        let finals: Vec<f64> = (0..12).map(|i| i as f64 / 20.0).collect();
        let ledger = ledger_of(&finals);
        let summary = summarize(&ledger);

        assert_eq!(summary.count, 10);
        assert_eq!(summary.series.len(), 10);
        // oldest surviving entry is doc-2
        assert!((summary.series[0].value_percent - 10.0).abs() < 1e-9);
        assert!((summary.series[9].value_percent - 55.0).abs() < 1e-9);
    }
}
