//! 响应分类：把 HTTP 状态与响应体映射为答案或结构化失败。
//!
//! Response classification.
//!
//! A pure function of `(status, body)`: the same captured response always yields the same
//! outcome. Rules, first match wins:
//! 1. non-2xx: content-policy marker anywhere in the body, else structured `{code, message}`,
//!    else raw status + body;
//! 2. 2xx with a missing or non-zero payload code;
//! 3. no usable candidate text;
//! 4. success, with the answer text cleaned.

use crate::error::RetrievalFailure;
use crate::protocol::{CompletionResponse, Usage};
use once_cell::sync::Lazy;
use regex::Regex;

/// Vendor error code for a content-policy rejection.
pub const CONTENT_POLICY_CODE: i64 = 10019;
const CONTENT_POLICY_MARKER: &str = "10019";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static EMPHASIS_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_~]").expect("valid regex"));

/// Successful classification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAnswer {
    pub text: String,
    pub usage: Option<Usage>,
}

/// Classify a complete response into answer text or a failure.
pub fn classify_response(status: u16, body: &str) -> Result<String, RetrievalFailure> {
    classify_completion(status, body).map(|a| a.text)
}

/// Same as [`classify_response`], keeping the usage metadata of a success.
pub fn classify_completion(status: u16, body: &str) -> Result<ClassifiedAnswer, RetrievalFailure> {
    if !(200..300).contains(&status) {
        return Err(classify_error_status(status, body));
    }

    let parsed = match CompletionResponse::from_json(body) {
        Ok(p) => p,
        Err(e) => {
            if body.contains(CONTENT_POLICY_MARKER) {
                return Err(RetrievalFailure::ContentPolicy { status });
            }
            return Err(RetrievalFailure::Unknown(format!(
                "invalid response JSON: {}",
                e
            )));
        }
    };

    if let CompletionResponse::Error { code, message } = parsed {
        if code == CONTENT_POLICY_CODE || body.contains(CONTENT_POLICY_MARKER) {
            return Err(RetrievalFailure::ContentPolicy { status });
        }
        return Err(RetrievalFailure::RemoteApi {
            status,
            code,
            message,
        });
    }

    let raw = parsed
        .first_content()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RetrievalFailure::EmptyAnswer)?;

    let text = clean_answer(raw);
    if text.is_empty() {
        return Err(RetrievalFailure::EmptyAnswer);
    }
    Ok(ClassifiedAnswer {
        text,
        usage: parsed.usage().cloned(),
    })
}

/// Classify a non-success status and its body.
pub fn classify_error_status(status: u16, body: &str) -> RetrievalFailure {
    if body.contains(CONTENT_POLICY_MARKER) {
        return RetrievalFailure::ContentPolicy { status };
    }
    match CompletionResponse::from_json(body) {
        Ok(CompletionResponse::Error { code, message }) => RetrievalFailure::RemoteApi {
            status,
            code,
            message,
        },
        _ => RetrievalFailure::UnclassifiedTransport {
            status,
            body: body.to_string(),
        },
    }
}

/// Collapse whitespace runs to one space, strip `*`, `_`, `~`, and trim.
pub fn clean_answer(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let stripped = EMPHASIS_MARKUP.replace_all(&collapsed, "");
    stripped.trim().to_string()
}
