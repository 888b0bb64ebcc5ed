//! REST client for the Gemini API.

use std::time::Duration;

use async_trait::async_trait;
use labelbase_core::providers::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResult, TokenUsage,
};

use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors from the Gemini API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The call succeeded but produced no text (blocked or empty).
    #[error("Gemini returned no content: {0}")]
    EmptyResponse(String),
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        GenerationError(err.to_string())
    }
}

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// API root without trailing slash.
    pub base_url: String,
    /// Per-request timeout. Video understanding can take a while.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(110),
        }
    }
}

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one `generateContent` request.
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Run a prompt against a video and collect text plus usage.
    pub async fn run_prompt(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GeminiError> {
        let body = GenerateContentRequest::for_video(
            &request.video_url,
            &request.prompt,
            request.system_prompt.as_deref(),
        );
        tracing::debug!(
            model = %self.model,
            video_url = %request.video_url,
            "Sending generateContent request"
        );
        let response = self.generate_content(&body).await?;

        let content = response.text().ok_or_else(|| {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| {
                    response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.clone())
                })
                .unwrap_or_else(|| "no candidates".to_string());
            tracing::warn!(model = %self.model, reason = %reason, "Gemini returned no text");
            GeminiError::EmptyResponse(reason)
        })?;

        let usage = match &response.usage_metadata {
            Some(u) => TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            },
            None => TokenUsage::approximate(&request.prompt, &content),
        };

        Ok(GenerationResult {
            content,
            model: response.model_version.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        self.run_prompt(request).await.map_err(GenerationError::from)
    }
}
