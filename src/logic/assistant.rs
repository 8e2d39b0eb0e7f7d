//! Assistant Context Bridge
//!
//! Keeps the conversational assistant pinned to the latest analysis.
//!
//! - One context slot, overwritten on every completed analysis
//! - An unread flag raised when context changes while the view is closed
//! - Messages carry the context as it was when they were sent

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::normalize::NormalizedResult;
use super::service::AnalysisApi;

pub const FALLBACK_GREETING: &str =
    "Hello! I'm your Detection Assistant. Upload a paper to analyze, then ask me about the results!";

pub const CHAT_FAILED: &str = "Sorry, I couldn't reach the assistant.";

/// Exchanges kept in the transcript; older ones are dropped first
pub const TRANSCRIPT_CAPACITY: usize = 50;

/// One completed message/reply pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub message: String,
    pub reply: String,
    /// File the attached context described, if any
    pub context_file: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Default)]
struct BridgeState {
    context: Option<Arc<NormalizedResult>>,
    unread: bool,
    view_open: bool,
    transcript: Vec<ChatExchange>,
}

#[derive(Default)]
pub struct AssistantBridge {
    state: Mutex<BridgeState>,
}

impl AssistantBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the context slot with the latest analysis
    pub fn update(&self, result: Arc<NormalizedResult>) {
        let mut state = self.state.lock();
        log::debug!("Assistant context now {}", result.file_name);
        state.context = Some(result);
        Self::notify(&mut state);
    }

    /// Flag new context for a closed assistant view
    fn notify(state: &mut BridgeState) {
        if !state.view_open {
            state.unread = true;
        }
    }

    /// Current context (a snapshot; later updates do not change it)
    pub fn context(&self) -> Option<Arc<NormalizedResult>> {
        self.state.lock().context.clone()
    }

    pub fn has_unread(&self) -> bool {
        self.state.lock().unread
    }

    pub fn is_view_open(&self) -> bool {
        self.state.lock().view_open
    }

    pub fn open_view(&self) {
        let mut state = self.state.lock();
        state.view_open = true;
        state.unread = false;
    }

    pub fn close_view(&self) {
        self.state.lock().view_open = false;
    }

    pub fn transcript(&self) -> Vec<ChatExchange> {
        self.state.lock().transcript.clone()
    }

    /// Send a message with the context as of this call.
    ///
    /// Blank messages are ignored (`None`). Failures become a canned reply.
    pub async fn send_message<A>(&self, api: &A, message: &str) -> Option<String>
    where
        A: AnalysisApi + ?Sized,
    {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        // taken before the await
        let snapshot = self.context();

        let reply = match api.chat(message, snapshot.as_deref()).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Assistant message failed: {}", e);
                CHAT_FAILED.to_string()
            }
        };

        let mut state = self.state.lock();
        state.transcript.push(ChatExchange {
            message: message.to_string(),
            reply: reply.clone(),
            context_file: snapshot.map(|context| context.file_name.clone()),
            sent_at: Utc::now(),
        });
        if state.transcript.len() > TRANSCRIPT_CAPACITY {
            let excess = state.transcript.len() - TRANSCRIPT_CAPACITY;
            state.transcript.drain(..excess);
        }

        Some(reply)
    }

    /// Opening line for the assistant view
    pub async fn greeting<A>(&self, api: &A) -> String
    where
        A: AnalysisApi + ?Sized,
    {
        match api.greeting().await {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Greeting fetch failed: {}", e);
                FALLBACK_GREETING.to_string()
            }
        }
    }
}
