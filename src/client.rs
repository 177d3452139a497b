//! Answer-retrieval client.
//!
//! Turns one question into one cleaned answer or one classified failure, under a hard
//! deadline. Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;
pub mod streaming;
pub mod types;

pub use builder::AnswerClientBuilder;
pub use core::{AnswerClient, AnswerSource};
pub use error_classification::{classify_response, clean_answer, CONTENT_POLICY_CODE};
pub use streaming::{AnswerStream, Utf8ChunkDecoder};
pub use types::{CancelHandle, RetrievalOutcome};
