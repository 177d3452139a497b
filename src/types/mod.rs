//! 类型模块：请求中使用的消息与工具声明类型。
//!
//! # Types Module
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Role-tagged message part |
//! | [`MessageRole`] | `system`, `user` or `assistant` |
//! | [`ToolDefinition`] | Tool declaration (always disabled) |
//! | [`ToolChoice`] | Tool-choice directive (always `none`) |

pub mod message;
pub mod tool;

pub use message::{Message, MessageRole};
pub use tool::{ToolChoice, ToolDefinition};
