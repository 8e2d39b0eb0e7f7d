use std::time::Duration;

/// Analysis service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// Connection refused, DNS, TLS, broken body stream
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {}", fmt_duration(.0))]
    Timeout(Duration),

    /// Non-2xx response carrying a `detail` message
    #[error("service error ({status}): {detail}")]
    Service { status: u16, detail: String },

    /// Body did not have the expected JSON shape
    #[error("malformed response: {0}")]
    Parse(String),
}

impl ServiceError {
    /// Text shown to the user.
    ///
    /// Service-reported details are passed through verbatim; everything else
    /// is a connectivity problem from the user's point of view.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { detail, .. } => format!("Error: {}", detail),
            Self::Network(e) | Self::Parse(e) => format!("Network Error: {}", e),
            Self::Timeout(after) => {
                format!("Network Error: request timed out after {}", fmt_duration(after))
            }
        }
    }

    /// Transport-class failure (anything the service did not report itself)
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Service { .. })
    }
}

/// Whole seconds as `Ns`, anything finer as `Nms`
fn fmt_duration(duration: &Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Parse(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let service = ServiceError::Service {
            status: 415,
            detail: "unsupported file type".to_string(),
        };
        assert_eq!(service.user_message(), "Error: unsupported file type");
        assert!(!service.is_transport());

        let network = ServiceError::Network("connection refused".to_string());
        assert_eq!(network.user_message(), "Network Error: connection refused");
        assert!(network.is_transport());

        let timeout = ServiceError::Timeout(Duration::from_secs(30));
        assert_eq!(timeout.user_message(), "Network Error: request timed out after 30s");

        assert!(ServiceError::Parse("eof".to_string()).is_transport());
    }

    #[test]
    fn test_sub_second_timeout_keeps_its_unit() {
        let timeout = ServiceError::Timeout(Duration::from_millis(250));
        assert_eq!(timeout.user_message(), "Network Error: request timed out after 250ms");
        assert_eq!(timeout.to_string(), "request timed out after 250ms");

        let timeout = ServiceError::Timeout(Duration::from_secs(120));
        assert_eq!(timeout.to_string(), "request timed out after 120s");
    }
}
