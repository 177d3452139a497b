//! Completion response payload

use serde::{Deserialize, Serialize};

/// Token usage reported by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Choice {
    pub fn content(&self) -> Option<&str> {
        self.message.as_ref()?.content.as_deref()
    }
}

/// Discriminated response: exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResponse {
    Success {
        choices: Vec<Choice>,
        usage: Option<Usage>,
    },
    Error {
        code: i64,
        message: String,
    },
}

/// Loose on-the-wire shape; every field optional so that both variants parse.
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    error: Option<RawErrorObject>,
}

/// OpenAI-style nested error object: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
struct RawErrorObject {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Code used when the nested error object carries a non-numeric code.
pub const NON_NUMERIC_ERROR_CODE: i64 = -1;

fn numeric_code(v: &serde_json::Value) -> i64 {
    match v {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(NON_NUMERIC_ERROR_CODE),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(NON_NUMERIC_ERROR_CODE),
        _ => NON_NUMERIC_ERROR_CODE,
    }
}

impl CompletionResponse {
    /// Parse a response body.
    ///
    /// Only a top-level `code` of `0` selects the success shape. Any other code, a nested
    /// `error` object, or a missing `code` selects the error shape; a missing or non-numeric
    /// code is reported as [`NON_NUMERIC_ERROR_CODE`].
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawResponse = serde_json::from_str(body)?;

        if let Some(code) = raw.code {
            if code != 0 {
                return Ok(CompletionResponse::Error {
                    code,
                    message: raw.message.unwrap_or_default(),
                });
            }
        }

        if let Some(err) = raw.error {
            return Ok(CompletionResponse::Error {
                code: err
                    .code
                    .as_ref()
                    .map(numeric_code)
                    .unwrap_or(NON_NUMERIC_ERROR_CODE),
                message: err.message.or(raw.message).unwrap_or_default(),
            });
        }

        if raw.code.is_none() {
            return Ok(CompletionResponse::Error {
                code: NON_NUMERIC_ERROR_CODE,
                message: raw.message.unwrap_or_default(),
            });
        }

        Ok(CompletionResponse::Success {
            choices: raw.choices.unwrap_or_default(),
            usage: raw.usage,
        })
    }

    pub fn usage(&self) -> Option<&Usage> {
        match self {
            CompletionResponse::Success { usage, .. } => usage.as_ref(),
            CompletionResponse::Error { .. } => None,
        }
    }

    /// Text of the first candidate, if any. Later candidates are never consulted.
    pub fn first_content(&self) -> Option<&str> {
        match self {
            CompletionResponse::Success { choices, .. } => choices.first()?.content(),
            CompletionResponse::Error { .. } => None,
        }
    }
}
