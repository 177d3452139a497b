use crate::error::RetrievalFailure;
use tokio_util::sync::CancellationToken;

/// Outcome of one answer retrieval: the cleaned answer text or a classified failure.
pub type RetrievalOutcome = std::result::Result<String, RetrievalFailure>;

/// Handle that aborts an in-flight retrieval or stream.
///
/// Cloning yields handles that share the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
