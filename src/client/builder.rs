use crate::client::core::AnswerClient;
use crate::config::ClientConfig;
use crate::knowledge::KnowledgePreamble;
use crate::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Builder for [`AnswerClient`].
///
/// Keep this surface area small and predictable.
pub struct AnswerClientBuilder {
    config: Option<ClientConfig>,
    preamble: Option<KnowledgePreamble>,
    knowledge_file: Option<PathBuf>,
    credential: Option<String>,
    timeout: Option<Duration>,
    /// Override the endpoint (primarily for testing with mock servers)
    endpoint_override: Option<String>,
    strict: bool,
}

impl AnswerClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            preamble: None,
            knowledge_file: None,
            credential: None,
            timeout: None,
            endpoint_override: None,
            strict: false,
        }
    }

    /// Start from an explicit configuration. Defaults to [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn preamble(mut self, preamble: KnowledgePreamble) -> Self {
        self.preamble = Some(preamble);
        self
    }

    /// Load the preamble from a text file at build time.
    pub fn knowledge_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_file = Some(path.into());
        self
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the endpoint from the configuration.
    pub fn endpoint_override(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    /// Run full [`ClientConfig::validate`] at build time, rejecting a missing credential.
    pub fn strict(mut self, enable: bool) -> Self {
        self.strict = enable;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AnswerClient> {
        let mut config = self.config.unwrap_or_else(ClientConfig::from_env);
        if let Some(endpoint) = self.endpoint_override {
            config.endpoint = endpoint;
        }
        if let Some(credential) = self.credential {
            config.credential = Some(credential);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if self.strict {
            config.validate()?;
        }

        // explicit preamble > builder file > config file > built-in
        let preamble = match (self.preamble, self.knowledge_file.or(config.knowledge_file.clone())) {
            (Some(p), _) => p,
            (None, Some(path)) => KnowledgePreamble::from_file(path)?,
            (None, None) => KnowledgePreamble::default(),
        };

        AnswerClient::new(config, preamble)
    }
}

impl Default for AnswerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
