//! Session Controller - owns the single analysis slot
//!
//! Flow for one submission:
//! 1. No file, or a submission already in flight: ignored, nothing changes
//! 2. Slot goes `Submitting`, busy indicator on, pending placeholder shown
//! 3. `/analyze` (bounded by the submit timeout)
//! 4. Success: normalize -> display -> history append -> assistant context
//! 5. Failure: error text displayed; history and assistant untouched
//! 6. Slot back to `Idle`, busy indicator off (on every path)

mod state;


pub use state::{Completion, DisplayState, SlotState};

use std::sync::Arc;
use std::time::Duration;

use super::analytics::{self, ActivitySummary};
use super::assistant::AssistantBridge;
use super::history::{HistoryStore, LedgerStorage};
use super::normalize::{normalize, NormalizedResult};
use super::service::{AnalysisApi, ServiceError, UploadFile};
use crate::constants::DEFAULT_TIMEOUT_SECS;
use state::Slot;

pub const FEEDBACK_FAILED: &str = "Failed to send feedback.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoFile,
    InFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Succeeded(Arc<NormalizedResult>),
    /// User-visible error text
    Failed(String),
}

pub struct SessionController<A, S> {
    api: A,
    history: HistoryStore<S>,
    assistant: AssistantBridge,
    slot: Slot,
    submit_timeout: Duration,
}

impl<A: AnalysisApi, S: LedgerStorage> SessionController<A, S> {
    pub fn new(api: A, history: HistoryStore<S>) -> Self {
        Self {
            api,
            history,
            assistant: AssistantBridge::new(),
            slot: Slot::new(),
            submit_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    // ========== Accessors ==========

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn assistant(&self) -> &AssistantBridge {
        &self.assistant
    }

    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn display(&self) -> DisplayState {
        self.slot.display()
    }

    /// Dashboard statistics over the persisted ledger
    pub fn activity(&self) -> ActivitySummary {
        analytics::summarize(&self.history.load())
    }

    // ========== Submission ==========

    /// Run one analysis. See the module docs for the exact sequence.
    pub async fn submit(&self, file: Option<UploadFile>) -> SubmitOutcome {
        let Some(file) = file else {
            log::debug!("Submit ignored: no file selected");
            return SubmitOutcome::Ignored(IgnoreReason::NoFile);
        };

        let Some(submission) = self.slot.try_begin(&file.name) else {
            log::debug!("Submit ignored: analysis already in flight ({})", file.name);
            return SubmitOutcome::Ignored(IgnoreReason::InFlight);
        };

        log::info!("Analysis started: {}", submission.file_name());

        let response = match tokio::time::timeout(self.submit_timeout, self.api.analyze(&file)).await {
            Ok(response) => response,
            Err(_) => Err(ServiceError::Timeout(self.submit_timeout)),
        };

        match response {
            Ok(raw) => {
                let result = Arc::new(normalize(&raw));

                self.slot.set_display(DisplayState::Result(result.clone()));
                self.history.append(NormalizedResult::clone(&result));
                self.assistant.update(result.clone());

                submission.finish(Completion::Succeeded);
                SubmitOutcome::Succeeded(result)
            }
            Err(e) => {
                let message = e.user_message();
                log::warn!("Analysis of {} failed: {}", submission.file_name(), e);

                self.slot.set_display(DisplayState::Error(message.clone()));

                submission.finish(Completion::Failed);
                SubmitOutcome::Failed(message)
            }
        }
    }

    // ========== Display ==========

    /// Re-display a past result. Leaves the ledger and assistant alone.
    pub fn show_history(&self, id: i64) -> bool {
        match self.history.find_by_id(id) {
            Some(entry) => {
                self.slot.set_display(DisplayState::Result(Arc::new(entry.result)));
                true
            }
            None => {
                log::debug!("History entry {} not found", id);
                false
            }
        }
    }

    /// Hide the current result; refused while an analysis is running
    pub fn clear_display(&self) -> bool {
        self.slot.clear_display()
    }

    // ========== Feedback ==========

    /// Report whether the displayed result was accurate.
    ///
    /// `None` when no result is displayed; otherwise the service's reply or
    /// a generic failure line.
    pub async fn send_feedback(&self, is_accurate: bool) -> Option<String> {
        let DisplayState::Result(result) = self.slot.display() else {
            return None;
        };

        match self.api.feedback(&result.file_name, is_accurate).await {
            Ok(message) => Some(message),
            Err(e) => {
                log::warn!("Feedback for {} failed: {}", result.file_name, e);
                Some(FEEDBACK_FAILED.to_string())
            }
        }
    }

    // ========== Assistant ==========

    pub async fn send_chat(&self, message: &str) -> Option<String> {
        self.assistant.send_message(&self.api, message).await
    }

    pub async fn greeting(&self) -> String {
        self.assistant.greeting(&self.api).await
    }
}
