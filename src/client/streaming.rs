//! 流式回答：按接收顺序逐段产出 UTF-8 文本片段。
//!
//! Streaming answers.
//!
//! [`AnswerStream`] is a lazy, finite, non-restartable stream of text fragments decoded from the
//! response body in the order the bytes arrive. It shares the deadline and cancel handle of the
//! call that opened it: when either fires, the stream yields one final failure and ends.

use crate::client::core::{bounded, transport_failure, AnswerClient};
use crate::client::error_classification::classify_error_status;
use crate::client::types::CancelHandle;
use crate::error::RetrievalFailure;
use crate::transport::TransportError;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{info, warn};
use uuid::Uuid;

/// Incremental UTF-8 decoder.
///
/// Holds back at most one incomplete character between chunks; invalid sequences become
/// U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the text that is complete so far (possibly empty).
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    out.push_str(s);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // truncated character at the end: wait for the next chunk
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush whatever is left at end of input.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}

type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, RetrievalFailure>> + Send>>;

/// Stream of answer text fragments.
pub struct AnswerStream {
    inner: FragmentStream,
}

struct StreamState<S> {
    input: Pin<Box<S>>,
    decoder: Utf8ChunkDecoder,
    cancel: CancelHandle,
    deadline: tokio::time::Instant,
    timeout_ms: u64,
    done: bool,
}

impl AnswerStream {
    /// Wrap a byte stream. Exposed so that callers can drive the decoder from any byte source.
    pub fn from_bytes<S, E>(
        input: S,
        deadline: tokio::time::Instant,
        timeout_ms: u64,
        cancel: CancelHandle,
    ) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let state = StreamState {
            input: Box::pin(input),
            decoder: Utf8ChunkDecoder::new(),
            cancel,
            deadline,
            timeout_ms,
            done: false,
        };

        let inner = stream::unfold(state, |mut st| async move {
            loop {
                if st.done {
                    return None;
                }
                tokio::select! {
                    biased;
                    _ = st.cancel.cancelled() => {
                        st.done = true;
                        return Some((Err(RetrievalFailure::Cancelled), st));
                    }
                    _ = tokio::time::sleep_until(st.deadline) => {
                        st.done = true;
                        let timeout_ms = st.timeout_ms;
                        return Some((Err(RetrievalFailure::Timeout { timeout_ms }), st));
                    }
                    next = st.input.next() => match next {
                        Some(Ok(bytes)) => {
                            let text = st.decoder.push(&bytes);
                            if text.is_empty() {
                                continue;
                            }
                            return Some((Ok(text), st));
                        }
                        Some(Err(e)) => {
                            st.done = true;
                            let failure =
                                RetrievalFailure::Unknown(format!("stream read failed: {}", e));
                            return Some((Err(failure), st));
                        }
                        None => {
                            st.done = true;
                            let tail = st.decoder.finish();
                            if tail.is_empty() {
                                return None;
                            }
                            return Some((Ok(tail), st));
                        }
                    },
                }
            }
        });

        Self {
            inner: Box::pin(inner),
        }
    }

    /// Drain the stream, concatenating all fragments. Stops at the first failure.
    pub async fn collect_text(mut self) -> Result<String, RetrievalFailure> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for AnswerStream {
    type Item = Result<String, RetrievalFailure>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl AnswerClient {
    /// Open a streaming retrieval.
    ///
    /// Preconditions and the classification of a non-success initial status are the same as
    /// for [`AnswerClient::retrieve_answer`]. The returned stream is bound by the same
    /// deadline, counted from this call.
    pub async fn stream_answer(
        &self,
        question: &str,
        cancel: Option<CancelHandle>,
    ) -> Result<AnswerStream, RetrievalFailure> {
        let question = self.precheck(question)?;
        let request = self.build_request(question).streaming(true);
        let client_request_id = Uuid::new_v4().to_string();
        let cancel = cancel.unwrap_or_default();
        let timeout_ms = self.timeout_ms();
        let deadline = tokio::time::Instant::now() + self.config.timeout();

        let opened = bounded(
            async {
                let resp = self
                    .transport
                    .post_completion(&request, &client_request_id)
                    .await
                    .map_err(|e| transport_failure(e, timeout_ms))?;

                let status = resp.status().as_u16();
                if !resp.status().is_success() {
                    let body = resp
                        .text()
                        .await
                        .map_err(|e| transport_failure(TransportError::Http(e), timeout_ms))?;
                    return Err(classify_error_status(status, &body));
                }
                Ok::<_, RetrievalFailure>((status, resp))
            },
            deadline,
            timeout_ms,
            &cancel,
        )
        .await;

        match opened {
            Ok((status, resp)) => {
                info!(
                    client_request_id = client_request_id.as_str(),
                    http_status = status,
                    "history-qa answer stream opened"
                );
                let bytes = resp.bytes_stream().map(|r| r.map_err(TransportError::Http));
                Ok(AnswerStream::from_bytes(bytes, deadline, timeout_ms, cancel))
            }
            Err(failure) => {
                warn!(
                    client_request_id = client_request_id.as_str(),
                    failure_kind = failure.kind().as_str(),
                    http_status = failure.http_status().unwrap_or(0),
                    "history-qa answer stream failed to open"
                );
                Err(failure)
            }
        }
    }
}
