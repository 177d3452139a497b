//! # history-qa
//!
//! 东北师范大学校史问答组件的 Rust 实现：答案检索客户端 + 会话控制器。
//!
//! Answer-retrieval client and conversation controller for a university-history Q&A widget.
//!
//! ## Overview
//!
//! A question goes to a remote chat-completion service together with a fixed factual
//! preamble. The reply is cleaned and returned, or the failure is classified into a small
//! taxonomy with a fixed user-facing message per category.
//!
//! - **Grounded**: every request carries the same knowledge preamble and instruction template
//! - **Tool-free**: web search is declared and disabled, tool choice is `"none"`
//! - **Bounded**: one hard deadline per request, cancellable from the caller
//! - **Single-flight**: the controller never has more than one question in flight
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use history_qa::{AnswerClient, ConversationController};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> history_qa::Result<()> {
//!     let client = AnswerClient::builder()
//!         .credential("your-api-key")
//!         .strict(true)
//!         .build()?;
//!
//!     let controller = ConversationController::new(Arc::new(client));
//!     controller.submit("东北师范大学成立于哪一年？").await;
//!     for record in controller.exchanges() {
//!         println!("{}", record.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Endpoint, credential, sampling and timeout settings |
//! | [`knowledge`] | Knowledge preamble and system instruction |
//! | [`protocol`] | Completion request and response wire shapes |
//! | [`transport`] | HTTP transport |
//! | [`client`] | Answer client, classification and streaming |
//! | [`conversation`] | Conversation controller and display mapping |
//! | [`types`] | Messages and tool declarations |

pub mod client;
pub mod config;
pub mod conversation;
pub mod knowledge;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{AnswerClient, AnswerClientBuilder, AnswerSource, AnswerStream, CancelHandle};
pub use config::{ClientConfig, SamplingParams};
pub use conversation::{ChatExchange, ConversationController, Direction, SubmitOutcome};
pub use knowledge::KnowledgePreamble;
pub use types::message::{Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, FailureKind, RetrievalFailure};
