//! Service Module - Client to Analysis Service Communication
//!
//! This module handles:
//! - File submission for analysis
//! - Accuracy feedback
//! - Assistant chat and greeting
//! - Health checks

mod client;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use client::{AnalysisApi, HttpAnalysisClient, ServiceConfig};
pub use error::ServiceError;
pub use types::{HealthResponse, UploadFile};
