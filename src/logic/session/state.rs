//! Analysis slot state machine
//!
//! ```text
//! Idle --try_begin--> Submitting --finish(Succeeded | Failed)--> Idle
//! ```
//!
//! A [`Submission`] token is the only way out of `Submitting`. `finish`
//! consumes it, so a request cannot complete twice, and dropping it on any
//! other path (early return, cancelled future, panic) still releases the
//! slot and the busy indicator.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::logic::normalize::NormalizedResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Completion {
    Succeeded,
    Failed,
}

/// What the renderer should show in the result area
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Empty,
    /// Placeholder while the analysis runs
    Pending { file_name: String },
    Result(Arc<NormalizedResult>),
    Error(String),
}

struct SlotInner {
    state: SlotState,
    busy: bool,
    display: DisplayState,
}

pub(crate) struct Slot {
    inner: Mutex<SlotInner>,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                state: SlotState::Idle,
                busy: false,
                display: DisplayState::Empty,
            }),
        }
    }

    /// Idle -> Submitting. `None` while another submission is in flight.
    pub(crate) fn try_begin(&self, file_name: &str) -> Option<Submission<'_>> {
        let mut inner = self.inner.lock();
        if inner.state == SlotState::Submitting {
            return None;
        }

        inner.state = SlotState::Submitting;
        inner.busy = true;
        inner.display = DisplayState::Pending {
            file_name: file_name.to_string(),
        };

        Some(Submission {
            slot: self,
            file_name: file_name.to_string(),
        })
    }

    pub(crate) fn state(&self) -> SlotState {
        self.inner.lock().state
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.inner.lock().busy
    }

    pub(crate) fn display(&self) -> DisplayState {
        self.inner.lock().display.clone()
    }

    pub(crate) fn set_display(&self, display: DisplayState) {
        self.inner.lock().display = display;
    }

    /// Hide the result area; refused while a submission is running
    pub(crate) fn clear_display(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == SlotState::Submitting {
            return false;
        }
        inner.display = DisplayState::Empty;
        true
    }
}

/// Proof that the slot is `Submitting`
pub(crate) struct Submission<'a> {
    slot: &'a Slot,
    file_name: String,
}

impl Submission<'_> {
    pub(crate) fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn finish(self, completion: Completion) -> Completion {
        log::info!("Analysis of {} finished: {:?}", self.file_name, completion);
        completion
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        let mut inner = self.slot.inner.lock();
        inner.state = SlotState::Idle;
        inner.busy = false;

        // abandoned before an outcome was shown
        if matches!(inner.display, DisplayState::Pending { .. }) {
            inner.display = DisplayState::Empty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_refused_until_release() {
        let slot = Slot::new();

        let first = slot.try_begin("a.pdf").unwrap();
        assert_eq!(slot.state(), SlotState::Submitting);
        assert!(slot.is_busy());
        assert!(slot.try_begin("b.pdf").is_none());
        assert_eq!(first.file_name(), "a.pdf");

        assert_eq!(first.finish(Completion::Failed), Completion::Failed);
        assert_eq!(slot.state(), SlotState::Idle);
        assert!(!slot.is_busy());
        assert!(slot.try_begin("b.pdf").is_some());
    }

    #[test]
    fn test_dropped_submission_releases_and_clears_placeholder() {
        let slot = Slot::new();
        {
            let _submission = slot.try_begin("a.pdf").unwrap();
            assert_eq!(
                slot.display(),
                DisplayState::Pending {
                    file_name: "a.pdf".to_string()
                }
            );
        }

        assert_eq!(slot.state(), SlotState::Idle);
        assert!(!slot.is_busy());
        assert_eq!(slot.display(), DisplayState::Empty);
    }

    #[test]
    fn test_clear_display_refused_while_submitting() {
        let slot = Slot::new();
        slot.set_display(DisplayState::Error("boom".to_string()));

        let submission = slot.try_begin("a.pdf").unwrap();
        assert!(!slot.clear_display());
        drop(submission);

        slot.set_display(DisplayState::Error("boom".to_string()));
        assert!(slot.clear_display());
        assert_eq!(slot.display(), DisplayState::Empty);
    }
}
