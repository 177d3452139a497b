//! 协议层：讯飞星火兼容的对话补全接口的请求/响应结构。
//!
//! # Wire Protocol
//!
//! Request and response shapes of the conversational completion endpoint.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | [`CompletionRequest`] body sent by the answer client |
//! | [`response`] | [`CompletionResponse`] discriminated success/error payload |

pub mod request;
pub mod response;

pub use request::CompletionRequest;
pub use response::{Choice, ChoiceMessage, CompletionResponse, Usage};
