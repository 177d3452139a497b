//! Tool declarations carried in the request body.
//!
//! The answer client never lets the model act on the outside world, so the only tool shape it
//! ever sends is the vendor's `web_search` entry switched off.

use serde::{Deserialize, Serialize};

/// Tool definition in the vendor's `{"type": ..., "<type>": {...}}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String, // "web_search"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search: Option<WebSearchToggle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchToggle {
    pub enable: bool,
}

impl ToolDefinition {
    /// `web_search` declared but disabled.
    pub fn web_search_disabled() -> Self {
        Self {
            tool_type: "web_search".to_string(),
            web_search: Some(WebSearchToggle { enable: false }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.web_search.map(|w| w.enable).unwrap_or(false)
    }
}

/// OpenAI-style `tool_choice`. Only `"none"` is ever emitted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    None,
}
