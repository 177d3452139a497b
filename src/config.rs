//! 配置：接口地址、模型、密钥、采样参数与超时，支持环境变量和 YAML 文件。
//!
//! Client configuration.
//!
//! Configuration is an explicit value passed to constructors. It can be assembled in code, read
//! from environment variables, or loaded from a YAML file (with environment overrides applied on
//! top). A missing credential is detectable at startup through [`ClientConfig::validate`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "HISTORY_QA_ENDPOINT";
pub const ENV_MODEL: &str = "HISTORY_QA_MODEL";
pub const ENV_USER_ID: &str = "HISTORY_QA_USER_ID";
pub const ENV_API_KEY: &str = "HISTORY_QA_API_KEY";
/// Legacy name of the credential variable, still honored.
pub const ENV_API_KEY_LEGACY: &str = "XUNFEI_API_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "HISTORY_QA_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "HISTORY_QA_PROXY_URL";
pub const ENV_KNOWLEDGE_FILE: &str = "HISTORY_QA_KNOWLEDGE_FILE";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/xfyun/v2/chat/completions";
pub const DEFAULT_MODEL: &str = "spark-x";
pub const DEFAULT_USER_ID: &str = "nenu_history_user";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling parameters, tuned low for factual recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 4096,
            top_p: 0.8,
        }
    }
}

impl SamplingParams {
    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::configuration_field(
                format!("temperature {} out of range [0, 2]", self.temperature),
                "sampling.temperature",
            ));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(Error::configuration_field(
                format!("top_p {} out of range (0, 1]", self.top_p),
                "sampling.top_p",
            ));
        }
        if self.max_tokens == 0 {
            return Err(Error::configuration_field(
                "max_tokens must be positive",
                "sampling.max_tokens",
            ));
        }
        Ok(())
    }
}

/// Answer client configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the completion endpoint.
    pub endpoint: String,
    pub model: String,
    /// Value of the request's `user` field.
    pub user_id: String,
    /// Bearer credential. Never serialized back out.
    #[serde(skip_serializing)]
    pub credential: Option<String>,
    pub sampling: SamplingParams,
    /// Hard deadline for one retrieval, in milliseconds.
    pub timeout_ms: u64,
    pub proxy_url: Option<String>,
    pub pool_max_idle_per_host: usize,
    /// Optional file replacing the built-in knowledge preamble.
    pub knowledge_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            credential: None,
            sampling: SamplingParams::default(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            proxy_url: None,
            pool_max_idle_per_host: 8,
            knowledge_file: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("user_id", &self.user_id)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("sampling", &self.sampling)
            .field("timeout_ms", &self.timeout_ms)
            .field("proxy_url", &self.proxy_url)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("knowledge_file", &self.knowledge_file)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a YAML document. Unknown keys are ignored; missing keys take defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a YAML file. The credential is usually left out of the file and supplied via
    /// environment overrides.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Apply overrides from a key lookup (normally the environment). Unparseable numeric values
    /// are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = non_empty(ENV_ENDPOINT) {
            self.endpoint = v;
        }
        if let Some(v) = non_empty(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = non_empty(ENV_USER_ID) {
            self.user_id = v;
        }
        if let Some(v) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_API_KEY_LEGACY)) {
            self.credential = Some(v);
        }
        if let Some(secs) = non_empty(ENV_TIMEOUT_SECS).and_then(|s| s.parse::<u64>().ok()) {
            self.timeout_ms = secs.saturating_mul(1000);
        }
        if let Some(v) = non_empty(ENV_PROXY_URL) {
            self.proxy_url = Some(v);
        }
        if let Some(v) = non_empty(ENV_KNOWLEDGE_FILE) {
            self.knowledge_file = Some(PathBuf::from(v));
        }
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Credential if present and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Startup-time validation.
    pub fn validate(&self) -> Result<()> {
        if self.credential().is_none() {
            return Err(Error::configuration_field(
                format!("credential is missing (set {})", ENV_API_KEY),
                "credential",
            ));
        }
        self.validate_transport()?;
        self.sampling.validate()
    }

    /// Checks needed to construct a transport. The credential is not required here; a client
    /// built without one reports it on every call instead.
    pub(crate) fn validate_transport(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            Error::configuration_field(format!("invalid endpoint URL: {}", e), "endpoint")
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_field(
                format!("unsupported endpoint scheme: {}", url.scheme()),
                "endpoint",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::configuration_field("model must not be empty", "model"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::configuration_field(
                "timeout must be positive",
                "timeout_ms",
            ));
        }
        Ok(())
    }
}
