use crate::config::GeminiConfig;
use crate::prompt::build_prompt;
use crate::response::{extract_reply, provider_error_message};
use crate::transport::HttpTransport;
use crate::types::{GenerationRequest, ProviderEnvelope, Reply};
use crate::{Error, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefix of the text [`ReplyGenerator::generate_text`] returns on failure.
pub const ERROR_REPLY_PREFIX: &str = "Error processing request: ";

/// Turns an email into a reply with one call to the generative-language API.
///
/// Clones share the HTTP client and configuration; concurrent calls do not
/// coordinate with each other.
#[derive(Clone)]
pub struct ReplyGenerator {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) transport: Arc<HttpTransport>,
}

impl ReplyGenerator {
    pub fn builder() -> crate::client::builder::ReplyGeneratorBuilder {
        crate::client::builder::ReplyGeneratorBuilder::new()
    }

    /// Build a generator from `GEMINI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::builder().config(GeminiConfig::from_env()?).build()
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Generate a reply.
    ///
    /// Issues exactly one POST. Transport failures, non-2xx statuses, invalid
    /// JSON and missing fields all come back as distinct [`Error`] variants.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Reply> {
        let request_id = Uuid::new_v4().to_string();
        let prompt = build_prompt(request);
        let prompt_chars = prompt.len();
        let envelope = ProviderEnvelope::from_prompt(prompt);

        debug!(
            request_id = request_id.as_str(),
            prompt_chars,
            tone = request.effective_tone().unwrap_or("none"),
            "dispatching reply generation"
        );

        let start = std::time::Instant::now();
        let result = self.execute(&envelope).await;
        let duration_ms = start.elapsed().as_millis();

        match &result {
            Ok(reply) => info!(
                request_id = request_id.as_str(),
                duration_ms,
                finish_reason = reply.finish_reason.as_deref().unwrap_or("unknown"),
                "reply generated"
            ),
            Err(e) => warn!(
                request_id = request_id.as_str(),
                duration_ms,
                error_kind = e.kind().name(),
                error = %e,
                "reply generation failed"
            ),
        }

        result
    }

    /// Like [`generate`](Self::generate), but gives up with [`Error::Cancelled`]
    /// as soon as `cancel` fires. The in-flight request is dropped.
    pub async fn generate_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Reply> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("reply generation cancelled by caller");
                Err(Error::Cancelled)
            }
            result = self.generate(request) => result,
        }
    }

    /// Generate a reply and always return text.
    ///
    /// On failure the text is `"Error processing request: {error}"`. Callers
    /// that need to tell success from failure should use
    /// [`generate`](Self::generate) instead.
    pub async fn generate_text(&self, request: &GenerationRequest) -> String {
        match self.generate(request).await {
            Ok(reply) => reply.into_text(),
            Err(e) => format!("{}{}", ERROR_REPLY_PREFIX, e),
        }
    }

    async fn execute(&self, envelope: &ProviderEnvelope) -> Result<Reply> {
        let response = self.transport.post_json(envelope).await?;

        if !response.is_success() {
            info!(
                http_status = response.status,
                endpoint = self.transport.url().path(),
                "provider returned an error status"
            );
            let message = provider_error_message(&response.body)
                .unwrap_or_else(|| response.body.clone());
            return Err(Error::Remote {
                status: response.status,
                message,
            });
        }

        extract_reply(&response.body)
    }
}
