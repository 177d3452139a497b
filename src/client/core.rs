use crate::client::error_classification::{classify_completion, ClassifiedAnswer};
use crate::client::types::{CancelHandle, RetrievalOutcome};
use crate::config::ClientConfig;
use crate::error::RetrievalFailure;
use crate::knowledge::KnowledgePreamble;
use crate::protocol::CompletionRequest;
use crate::transport::{HttpTransport, TransportError};
use crate::Result;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Something that turns a question into an answer. The conversation controller only sees
/// this seam, so tests and alternative back-ends can stand in for [`AnswerClient`].
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn answer(&self, question: &str, cancel: &CancelHandle) -> RetrievalOutcome;
}

/// Answer-retrieval client for the completion endpoint.
pub struct AnswerClient {
    pub(crate) config: ClientConfig,
    pub(crate) preamble: KnowledgePreamble,
    pub(crate) transport: Arc<HttpTransport>,
}

impl AnswerClient {
    /// Create a client from explicit configuration and preamble.
    ///
    /// A missing credential does not fail construction; every call then reports
    /// [`RetrievalFailure::Configuration`] before touching the network. Use
    /// [`ClientConfig::validate`] to reject it at startup instead.
    pub fn new(config: ClientConfig, preamble: KnowledgePreamble) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self {
            config,
            preamble,
            transport,
        })
    }

    pub fn builder() -> crate::client::builder::AnswerClientBuilder {
        crate::client::builder::AnswerClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn preamble(&self) -> &KnowledgePreamble {
        &self.preamble
    }

    /// Build the request body for a question: one system part, one user part, tools off.
    pub fn build_request(&self, question: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.config.model,
            &self.config.user_id,
            self.preamble.system_prompt(),
            question.trim(),
            &self.config.sampling,
        )
    }

    /// Local checks done before any I/O. Returns the trimmed question.
    pub(crate) fn precheck<'q>(
        &self,
        question: &'q str,
    ) -> std::result::Result<&'q str, RetrievalFailure> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RetrievalFailure::EmptyQuestion);
        }
        if self.config.credential().is_none() {
            return Err(RetrievalFailure::Configuration(
                "API credential is not configured".to_string(),
            ));
        }
        Ok(question)
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    /// Retrieve one answer under the configured deadline.
    pub async fn retrieve_answer(&self, question: &str) -> RetrievalOutcome {
        self.retrieve_answer_with_cancel(question, &CancelHandle::new())
            .await
    }

    /// Retrieve one answer; `cancel` aborts the call early with [`RetrievalFailure::Cancelled`].
    pub async fn retrieve_answer_with_cancel(
        &self,
        question: &str,
        cancel: &CancelHandle,
    ) -> RetrievalOutcome {
        let question = self.precheck(question)?;
        let request = self.build_request(question);
        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.timeout();

        let outcome = bounded(
            self.execute_once(&request, &client_request_id),
            deadline,
            self.timeout_ms(),
            cancel,
        )
        .await;

        let duration_ms = start.elapsed().as_millis();
        match &outcome {
            Ok(answer) => info!(
                client_request_id = client_request_id.as_str(),
                duration_ms,
                answer_chars = answer.text.chars().count(),
                "history-qa answer retrieved"
            ),
            Err(failure) => warn!(
                client_request_id = client_request_id.as_str(),
                duration_ms,
                failure_kind = failure.kind().as_str(),
                http_status = failure.http_status().unwrap_or(0),
                "history-qa answer retrieval failed"
            ),
        }

        outcome.map(|a| a.text)
    }

    /// One POST plus full body read, then classification. No deadline here.
    async fn execute_once(
        &self,
        request: &CompletionRequest,
        client_request_id: &str,
    ) -> std::result::Result<ClassifiedAnswer, RetrievalFailure> {
        let resp = self
            .transport
            .post_completion(request, client_request_id)
            .await
            .map_err(|e| transport_failure(e, self.timeout_ms()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| transport_failure(TransportError::Http(e), self.timeout_ms()))?;

        debug!(
            client_request_id,
            http_status = status,
            body_len = body.len(),
            "history-qa response received"
        );

        let classified = classify_completion(status, &body)?;
        if let Some(usage) = &classified.usage {
            debug!(
                client_request_id,
                prompt_tokens = usage.prompt_tokens.unwrap_or(0),
                completion_tokens = usage.completion_tokens.unwrap_or(0),
                total_tokens = usage.total_tokens.unwrap_or(0),
                "history-qa token usage"
            );
        }
        Ok(classified)
    }
}

#[async_trait]
impl AnswerSource for AnswerClient {
    async fn answer(&self, question: &str, cancel: &CancelHandle) -> RetrievalOutcome {
        self.retrieve_answer_with_cancel(question, cancel).await
    }
}

/// Run `fut` until it settles, the deadline passes, or `cancel` fires, whichever comes first.
/// Losing the race drops `fut`, which aborts any in-flight HTTP exchange.
pub(crate) async fn bounded<F, T>(
    fut: F,
    deadline: tokio::time::Instant,
    timeout_ms: u64,
    cancel: &CancelHandle,
) -> std::result::Result<T, RetrievalFailure>
where
    F: Future<Output = std::result::Result<T, RetrievalFailure>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RetrievalFailure::Cancelled),
        r = tokio::time::timeout_at(deadline, fut) => match r {
            Ok(outcome) => outcome,
            Err(_) => Err(RetrievalFailure::Timeout { timeout_ms }),
        },
    }
}

pub(crate) fn transport_failure(e: TransportError, timeout_ms: u64) -> RetrievalFailure {
    if e.is_timeout() {
        RetrievalFailure::Timeout { timeout_ms }
    } else {
        RetrievalFailure::Unknown(e.to_string())
    }
}
