//! Configuration module

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;
use crate::logic::service::ServiceConfig;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Analysis service base URL (no trailing slash)
    pub server_url: String,

    /// Timeout applied to every service call, including submission
    pub timeout_secs: u64,

    /// File backing the persisted history ledger
    pub history_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let config = Self {
            server_url: constants::get_service_url(),
            timeout_secs: constants::get_timeout_secs(),
            history_path: constants::get_history_path(),
        };

        log::info!(
            "Client config: server={}, timeout={}s, history={}",
            config.server_url,
            config.timeout_secs,
            config.history_path.display()
        );

        config
    }

    /// Settings for the HTTP client
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            server_url: self.server_url.clone(),
            timeout_seconds: self.timeout_secs,
        }
    }

    /// Upper bound on a single analysis submission
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_carries_url_and_timeout() {
        let config = ClientConfig {
            server_url: "http://localhost:9000".to_string(),
            timeout_secs: 5,
            history_path: PathBuf::from("history.json"),
        };

        let service = config.service_config();
        assert_eq!(service.server_url, "http://localhost:9000");
        assert_eq!(service.timeout_seconds, 5);
        assert_eq!(config.submit_timeout(), Duration::from_secs(5));
    }
}
