use crate::config::ClientConfig;
use crate::protocol::CompletionRequest;
use crate::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Proxy;
use std::time::Duration;

/// Header carrying our own per-call correlation id. The endpoint may ignore it.
pub const REQUEST_ID_HEADER: &str = "x-history-qa-request-id";

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    credential: Option<String>,
}

impl HttpTransport {
    /// Build the underlying HTTP client.
    ///
    /// No overall request timeout is set on the client itself: the retrieval deadline is
    /// enforced by the caller so that it also covers body reads on the streaming path.
    /// Only an explicitly configured proxy is used; system proxy variables are ignored.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate_transport()?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                crate::Error::configuration_field(format!("invalid proxy URL: {}", e), "proxy_url")
            })?;
            builder = builder.proxy(proxy);
        } else {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credential: config.credential().map(str::to_string),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// POST the request body and return the raw response (any status).
    pub async fn post_completion(
        &self,
        request: &CompletionRequest,
        client_request_id: &str,
    ) -> std::result::Result<reqwest::Response, TransportError> {
        let accept = if request.stream {
            "text/event-stream"
        } else {
            "application/json"
        };

        let mut req = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, accept)
            .header(REQUEST_ID_HEADER, client_request_id)
            .json(request);

        if let Some(key) = &self.credential {
            req = req.bearer_auth(key);
        }

        req.send().await.map_err(TransportError::Http)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(e) if e.is_timeout())
    }
}
