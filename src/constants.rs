//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default analysis service, only edit this file.

use std::path::PathBuf;

/// Default analysis service URL
///
/// This is the fallback URL when no environment variable is set.
/// The service normally runs next to the web client on port 8000.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout (seconds) for every service call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum number of entries kept in the history ledger
pub const HISTORY_CAPACITY: usize = 10;

/// Well-known name of the persisted history slot
pub const HISTORY_SLOT: &str = "scanHistory";

/// Directory (under the local data dir) holding client state
pub const APP_DIR_NAME: &str = "ScholarScan";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Scholar Scan";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get analysis service URL from environment or use default
pub fn get_service_url() -> String {
    std::env::var("SCHOLAR_SCAN_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string())
}

/// Get request timeout from environment or use default
pub fn get_timeout_secs() -> u64 {
    std::env::var("SCHOLAR_SCAN_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Get history ledger location from environment or use the local data dir
pub fn get_history_path() -> PathBuf {
    std::env::var("SCHOLAR_SCAN_HISTORY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join(format!("{}.json", HISTORY_SLOT))
        })
}
