//! 失败提示文案：把分类后的失败映射为固定的用户可见文本。
//!
//! Display strings for classified failures.

use crate::error::RetrievalFailure;

pub const MSG_AUTHORIZATION: &str = "接口授权失败，请检查密钥配置";
pub const MSG_CONTENT_POLICY: &str = "问题可能涉及敏感内容，请调整后重试";
pub const MSG_SERVER_ERROR: &str = "服务器错误，正在修复中";
pub const MSG_EMPTY_ANSWER: &str = "未获取到有效回答";
pub const MSG_TIMEOUT: &str = "请求超时，请检查网络后重试";
pub const MSG_CONNECTIVITY: &str = "网络连接已断开，请检查网络设置";
pub const MSG_EMPTY_QUESTION: &str = "问题不能为空";
pub const MSG_CANCELLED: &str = "请求已取消";
pub const MSG_FALLBACK: &str = "获取回答失败，请重试";

/// Maximum number of characters of vendor detail shown to the user.
pub const DETAIL_MAX_CHARS: usize = 30;

/// Map a failure to the text appended to the history and shown in the notification.
pub fn display_text(failure: &RetrievalFailure) -> String {
    match failure {
        RetrievalFailure::Configuration(_) => MSG_AUTHORIZATION.to_string(),
        RetrievalFailure::EmptyQuestion => MSG_EMPTY_QUESTION.to_string(),
        RetrievalFailure::ContentPolicy { .. } => MSG_CONTENT_POLICY.to_string(),
        RetrievalFailure::UnclassifiedTransport { status: 401, .. } => MSG_AUTHORIZATION.to_string(),
        RetrievalFailure::UnclassifiedTransport { status: 500, .. } => MSG_SERVER_ERROR.to_string(),
        RetrievalFailure::RemoteApi { .. } | RetrievalFailure::UnclassifiedTransport { .. } => {
            format!("错误: {}...", truncate_chars(&failure.detail(), DETAIL_MAX_CHARS))
        }
        RetrievalFailure::EmptyAnswer => MSG_EMPTY_ANSWER.to_string(),
        RetrievalFailure::Timeout { .. } => MSG_TIMEOUT.to_string(),
        RetrievalFailure::Cancelled => MSG_CANCELLED.to_string(),
        RetrievalFailure::Connectivity => MSG_CONNECTIVITY.to_string(),
        RetrievalFailure::Unknown(_) => MSG_FALLBACK.to_string(),
    }
}

/// First `max` characters of `s` (never splits a character).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
