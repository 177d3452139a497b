//! 会话控制器：维护消息列表，单次只允许一个在途问题。
//!
//! Conversation controller.
//!
//! Owns the ordered exchange history, the pending-input buffer and the busy flag. The busy
//! check-and-set happens under a single lock acquisition and the lock is never held across an
//! `.await`, so at most one retrieval is in flight per controller even on a multi-threaded
//! runtime.

use crate::client::{AnswerSource, CancelHandle, RetrievalOutcome};
use crate::conversation::display::display_text;
use crate::conversation::exchange::ChatExchange;
use crate::conversation::host::{AlwaysOnline, ConnectivityProbe, Notifier, TracingNotifier};
use crate::error::{FailureKind, RetrievalFailure};
use crate::knowledge::QUICK_QUESTIONS;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

/// What happened to one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty question or a submission already in flight; nothing changed.
    Rejected,
    Answered,
    Failed(FailureKind),
}

struct InFlight {
    submission: Uuid,
    cancel: CancelHandle,
}

#[derive(Default)]
struct ConversationState {
    exchanges: Vec<ChatExchange>,
    input: String,
    next_sequence: u64,
    inflight: Option<InFlight>,
}

impl ConversationState {
    fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    fn owns_inflight(&self, submission: Uuid) -> bool {
        self.inflight
            .as_ref()
            .map(|f| f.submission == submission)
            .unwrap_or(false)
    }
}

/// Drives the answer source once per accepted submission.
pub struct ConversationController {
    source: Arc<dyn AnswerSource>,
    connectivity: Arc<dyn ConnectivityProbe>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<ConversationState>>,
}

impl ConversationController {
    /// Controller with [`AlwaysOnline`] connectivity and [`TracingNotifier`] notifications.
    pub fn new(source: Arc<dyn AnswerSource>) -> Self {
        Self {
            source,
            connectivity: Arc::new(AlwaysOnline),
            notifier: Arc::new(TracingNotifier),
            state: Arc::new(Mutex::new(ConversationState::default())),
        }
    }

    pub fn with_connectivity(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.connectivity = probe;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the history in submission order.
    pub fn exchanges(&self) -> Vec<ChatExchange> {
        self.state().exchanges.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state().inflight.is_some()
    }

    /// Current pending-input text.
    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state().input = text.into();
    }

    /// Put suggested question `index` into the input buffer. Returns `false` if out of range.
    pub fn quick_question(&self, index: usize) -> bool {
        match QUICK_QUESTIONS.get(index) {
            Some(q) => {
                self.set_input(*q);
                true
            }
            None => false,
        }
    }

    /// Abort the in-flight retrieval, if any. Returns whether there was one.
    pub fn cancel_inflight(&self) -> bool {
        match &self.state().inflight {
            Some(f) => {
                f.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Submit the pending-input buffer.
    pub async fn submit_pending(&self) -> SubmitOutcome {
        let question = self.input();
        self.submit(&question).await
    }

    /// Submit one question.
    ///
    /// No-op when the trimmed question is empty or another submission is in flight. Otherwise
    /// appends the user record, clears the input buffer, and settles with exactly one system
    /// record.
    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        let question = question.trim();
        let Some((submission, cancel)) = self.begin(question) else {
            return SubmitOutcome::Rejected;
        };
        let _guard = InFlightGuard {
            state: Arc::clone(&self.state),
            submission,
        };

        info!(submission = %submission, "history-qa question submitted");

        let outcome: RetrievalOutcome = if !self.connectivity.is_online() {
            Err(RetrievalFailure::Connectivity)
        } else {
            self.source.answer(question, &cancel).await
        };

        self.settle(submission, outcome)
    }

    /// Accept a submission: check-and-set busy, append the user record, clear the input.
    fn begin(&self, question: &str) -> Option<(Uuid, CancelHandle)> {
        if question.is_empty() {
            return None;
        }
        let mut st = self.state();
        if st.inflight.is_some() {
            return None;
        }

        let submission = Uuid::new_v4();
        let cancel = CancelHandle::new();
        let seq = st.next_sequence();
        st.exchanges
            .push(ChatExchange::question(submission, seq, question));
        st.input.clear();
        st.inflight = Some(InFlight {
            submission,
            cancel: cancel.clone(),
        });
        Some((submission, cancel))
    }

    /// Append the system record and clear busy, atomically.
    fn settle(&self, submission: Uuid, outcome: RetrievalOutcome) -> SubmitOutcome {
        let (record_text, result) = match outcome {
            Ok(answer) => (Ok(answer), SubmitOutcome::Answered),
            Err(failure) => {
                warn!(
                    submission = %submission,
                    failure_kind = failure.kind().as_str(),
                    detail = %failure,
                    "history-qa submission failed"
                );
                (Err(display_text(&failure)), SubmitOutcome::Failed(failure.kind()))
            }
        };

        {
            let mut st = self.state();
            let seq = st.next_sequence();
            let record = match &record_text {
                Ok(answer) => ChatExchange::answer(submission, seq, answer.clone()),
                Err(display) => ChatExchange::failure(submission, seq, display.clone()),
            };
            st.exchanges.push(record);
            if st.owns_inflight(submission) {
                st.inflight = None;
            }
        }

        if let Err(display) = &record_text {
            self.notifier.notify_error(display);
        }
        result
    }
}

/// Clears the busy flag if a submit future is dropped before it settles, closing the pair with
/// a cancellation record.
struct InFlightGuard {
    state: Arc<Mutex<ConversationState>>,
    submission: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !st.owns_inflight(self.submission) {
            return;
        }
        if let Some(f) = st.inflight.take() {
            f.cancel.cancel();
        }
        let seq = st.next_sequence();
        let text = display_text(&RetrievalFailure::Cancelled);
        st.exchanges
            .push(ChatExchange::failure(self.submission, seq, text));
    }
}
