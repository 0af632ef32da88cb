use crate::client::core::ReplyGenerator;
use crate::config::GeminiConfig;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`ReplyGenerator`].
pub struct ReplyGeneratorBuilder {
    config: Option<GeminiConfig>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
}

impl ReplyGeneratorBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            http_client: None,
            timeout: None,
        }
    }

    /// Set the provider configuration (required).
    pub fn config(mut self, config: GeminiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Reuse an existing HTTP client instead of building one from the config.
    ///
    /// Pool and proxy settings in the config are ignored in that case; the
    /// timeout still applies to every request.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Override the config's request timeout. Values below
    /// [`MIN_TIMEOUT`](crate::config::MIN_TIMEOUT) are raised to it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ReplyGenerator> {
        let mut config = self.config.ok_or_else(|| {
            Error::configuration_with_context(
                "No provider configuration given",
                ErrorContext::new().with_source("builder"),
            )
        })?;

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        let transport = match self.http_client {
            Some(client) => HttpTransport::with_client(&config, client),
            None => HttpTransport::new(&config)?,
        };

        Ok(ReplyGenerator {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }
}

impl Default for ReplyGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
