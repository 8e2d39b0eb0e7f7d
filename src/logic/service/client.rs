//! Analysis Service Client
//!
//! HTTP client for the remote analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ServiceError;
use super::types::{
    ChatRequest, ErrorResponse, FeedbackRequest, HealthResponse, MessageResponse, UploadFile,
};
use crate::logic::normalize::NormalizedResult;

/// Operations the controller needs from the analysis service
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /analyze`; returns the raw, un-normalized payload
    async fn analyze(&self, file: &UploadFile) -> Result<Value, ServiceError>;

    /// `POST /feedback`
    async fn feedback(&self, filename: &str, is_accurate: bool) -> Result<String, ServiceError>;

    /// `POST /chat`
    async fn chat(
        &self,
        message: &str,
        context: Option<&NormalizedResult>,
    ) -> Result<String, ServiceError>;

    /// `GET /chat/greeting`
    async fn greeting(&self) -> Result<String, ServiceError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse, ServiceError>;
}

/// Analysis service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub server_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        use crate::constants;

        Self {
            server_url: constants::get_service_url(),
            timeout_seconds: constants::get_timeout_secs(),
        }
    }
}

/// reqwest-backed [`AnalysisApi`]
pub struct HttpAnalysisClient {
    config: ServiceConfig,
    http_client: reqwest::Client,
}

impl HttpAnalysisClient {
    /// Create new service client
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AnalysisApi for HttpAnalysisClient {
    async fn analyze(&self, file: &UploadFile) -> Result<Value, ServiceError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        log::info!("Submitting {} ({} bytes) for analysis", file.name, file.bytes.len());

        let response = self
            .http_client
            .post(self.url("/analyze"))
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn feedback(&self, filename: &str, is_accurate: bool) -> Result<String, ServiceError> {
        let request = FeedbackRequest {
            filename,
            is_accurate,
        };

        let response = self
            .http_client
            .post(self.url("/feedback"))
            .json(&request)
            .send()
            .await?;

        let body: MessageResponse = read_json(response).await?;
        Ok(body.message)
    }

    async fn chat(
        &self,
        message: &str,
        context: Option<&NormalizedResult>,
    ) -> Result<String, ServiceError> {
        let request = ChatRequest {
            message,
            analysis_context: context,
        };

        let response = self
            .http_client
            .post(self.url("/chat"))
            .json(&request)
            .send()
            .await?;

        let body: MessageResponse = read_json(response).await?;
        Ok(body.message)
    }

    async fn greeting(&self) -> Result<String, ServiceError> {
        let response = self.http_client.get(self.url("/chat/greeting")).send().await?;

        let body: MessageResponse = read_json(response).await?;
        Ok(body.message)
    }

    async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let response = self.http_client.get(self.url("/health")).send().await?;
        read_json(response).await
    }
}

/// Decode a success body, or turn an error body into [`ServiceError::Service`].
///
/// An error body that is not JSON counts as a malformed response.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|e| ServiceError::Parse(e.to_string()));
    }

    let body: ErrorResponse =
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Parse(e.to_string()))?;
    let detail = body.detail_text();
    log::warn!("Service responded {}: {}", status.as_u16(), detail);

    Err(ServiceError::Service {
        status: status.as_u16(),
        detail,
    })
}
