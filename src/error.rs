//! 错误类型：区分启动期配置错误与单次问答请求的失败分类。
//!
//! Error types.
//!
//! Two layers live here:
//! - [`Error`] covers setup-time problems (configuration, transport construction, file I/O).
//! - [`RetrievalFailure`] is the per-request failure taxonomy produced by the answer client
//!   and consumed by the conversation controller. Variants are created where the failure is
//!   detected; nothing downstream re-derives them from message text.

use thiserror::Error;

/// Setup-time error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_field(.field))]
    Configuration {
        message: String,
        field: Option<String>,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_field(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" (field: {})", f),
        None => String::new(),
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            field: None,
        }
    }

    /// Configuration error pinned to a config key (e.g. `"credential"`, `"endpoint"`).
    pub fn configuration_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

/// Coarse category of a [`RetrievalFailure`], used for logging and display mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Configuration,
    EmptyQuestion,
    ContentPolicy,
    RemoteApi,
    UnclassifiedTransport,
    EmptyAnswer,
    Timeout,
    Cancelled,
    Connectivity,
    Unknown,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration",
            FailureKind::EmptyQuestion => "empty_question",
            FailureKind::ContentPolicy => "content_policy",
            FailureKind::RemoteApi => "remote_api",
            FailureKind::UnclassifiedTransport => "unclassified_transport",
            FailureKind::EmptyAnswer => "empty_answer",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Connectivity => "connectivity",
            FailureKind::Unknown => "unknown",
        }
    }
}

/// Classified failure of one answer retrieval.
///
/// Every variant is recoverable at the UI level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalFailure {
    #[error("credential not configured: {0}")]
    Configuration(String),

    #[error("question must not be empty")]
    EmptyQuestion,

    /// Remote vendor rejected the content (error code 10019).
    #[error("content policy rejection (HTTP {status})")]
    ContentPolicy { status: u16 },

    #[error("API error {code}: {message}")]
    RemoteApi {
        status: u16,
        code: i64,
        message: String,
    },

    #[error("request failed (HTTP {status}): {body}")]
    UnclassifiedTransport { status: u16, body: String },

    #[error("no valid answer in response")]
    EmptyAnswer,

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("request cancelled")]
    Cancelled,

    #[error("network disconnected")]
    Connectivity,

    #[error("{0}")]
    Unknown(String),
}

impl RetrievalFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            RetrievalFailure::Configuration(_) => FailureKind::Configuration,
            RetrievalFailure::EmptyQuestion => FailureKind::EmptyQuestion,
            RetrievalFailure::ContentPolicy { .. } => FailureKind::ContentPolicy,
            RetrievalFailure::RemoteApi { .. } => FailureKind::RemoteApi,
            RetrievalFailure::UnclassifiedTransport { .. } => FailureKind::UnclassifiedTransport,
            RetrievalFailure::EmptyAnswer => FailureKind::EmptyAnswer,
            RetrievalFailure::Timeout { .. } => FailureKind::Timeout,
            RetrievalFailure::Cancelled => FailureKind::Cancelled,
            RetrievalFailure::Connectivity => FailureKind::Connectivity,
            RetrievalFailure::Unknown(_) => FailureKind::Unknown,
        }
    }

    /// HTTP status carried by the failure, when one was observed.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RetrievalFailure::ContentPolicy { status }
            | RetrievalFailure::RemoteApi { status, .. }
            | RetrievalFailure::UnclassifiedTransport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Vendor-facing detail text (used for truncated display of generic failures).
    pub fn detail(&self) -> String {
        match self {
            RetrievalFailure::RemoteApi { code, message, .. } => {
                format!("接口错误 {}：{}", code, message)
            }
            RetrievalFailure::UnclassifiedTransport { status, body } => {
                format!("请求失败（{}）：{}", status, body)
            }
            other => other.to_string(),
        }
    }
}
