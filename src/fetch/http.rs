//! HTTP fetcher backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::{FetchError, Fetcher};

/// Fetches JSON over HTTP, resolving endpoint paths against a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::build(base_url, None)
    }

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Self::build(base_url, Some(timeout))
    }

    /// Wrap an already-configured client (proxies, TLS, headers).
    pub fn from_client(client: Client, base_url: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidUrl {
            url: base_url.to_owned(),
        };
        let parsed = Url::parse(base_url).map_err(|_| invalid())?;
        if parsed.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| FetchError::Transport {
            url: base_url.to_owned(),
            source,
        })?;
        Self::from_client(client, base_url)
    }

    /// The base URL endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path to a full URL.
    pub fn url_for(&self, endpoint: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(endpoint)
            .map_err(|_| FetchError::InvalidUrl {
                url: format!("{}{endpoint}", self.base_url),
            })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_text,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_text.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url_text,
            source,
        })
    }
}
