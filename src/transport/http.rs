use crate::config::{GeminiConfig, ENV_PROXY_URL};
use crate::{Error, ErrorContext, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Raw outcome of one POST: status code and body text.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single-endpoint JSON POST transport. Cheap to share; holds a pooled client.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host())
            .pool_idle_timeout(Some(config.pool_idle_timeout()));

        if let Some(proxy_url) = config.proxy_url() {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    "Proxy rejected by HTTP client",
                    ErrorContext::new()
                        .with_field_path(ENV_PROXY_URL)
                        .with_details(e.to_string())
                        .with_source("transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self::with_client(config, client))
    }

    /// Use a caller-supplied client. The configured timeout is still applied per request.
    pub fn with_client(config: &GeminiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            url: config.api_url().clone(),
            api_key: config.api_key().to_string(),
            timeout: config.timeout(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST `body` as JSON to the configured endpoint and read the whole response.
    pub async fn post_json<T: Serialize + ?Sized>(&self, body: &T) -> Result<HttpResponse> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse { status, body })
    }

    fn map_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                after: self.timeout,
            }
        } else {
            Error::Transport(TransportError::Http(e))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
