//! Scholar Scan - client controller for the scholarly paper analysis service
//!
//! Submits a paper for analysis, normalizes whatever shape the service
//! returns, keeps a bounded local history, and feeds the latest result to the
//! detection assistant.

pub mod config;
pub mod constants;
pub mod logic;

pub use config::ClientConfig;
pub use logic::analytics::{summarize, ActivitySummary};
pub use logic::assistant::AssistantBridge;
pub use logic::history::{FileStorage, HistoryEntry, HistoryLedger, HistoryStore, MemoryStorage};
pub use logic::normalize::{normalize, Decision, NormalizedResult};
pub use logic::service::{AnalysisApi, HttpAnalysisClient, ServiceError, UploadFile};
pub use logic::session::{DisplayState, SessionController, SlotState, SubmitOutcome};
