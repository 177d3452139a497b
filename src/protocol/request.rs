//! Completion request body

use crate::config::SamplingParams;
use crate::types::{Message, ToolChoice, ToolDefinition};
use serde::{Deserialize, Serialize};

/// Completion request body.
///
/// Exactly one system part followed by one user part; no multi-turn history is sent.
/// Tool use is always declared disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub user: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        user: impl Into<String>,
        system_prompt: impl Into<String>,
        question: impl Into<String>,
        sampling: &SamplingParams,
    ) -> Self {
        Self {
            model: model.into(),
            user: user.into(),
            messages: vec![Message::system(system_prompt), Message::user(question)],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            tools: vec![ToolDefinition::web_search_disabled()],
            tool_choice: ToolChoice::None,
            stream: false,
        }
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}
