//! 会话模块：问答历史、忙碌状态与失败提示。
//!
//! Conversation layer.
//!
//! The [`ConversationController`] turns each accepted question into exactly one
//! user record followed by exactly one system record. Host capabilities it depends on
//! (connectivity probe, transient notification) are traits in [`host`] so a front-end can
//! plug in its own.

pub mod controller;
pub mod display;
pub mod exchange;
pub mod host;

pub use controller::{ConversationController, SubmitOutcome};
pub use display::display_text;
pub use exchange::{ChatExchange, Direction};
pub use host::{
    AlwaysOnline, ConnectivityFlag, ConnectivityProbe, InMemoryNotifier, Notifier, TracingNotifier,
};
