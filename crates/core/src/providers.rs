//! Contracts for the two external collaborators: the video metadata
//! provider and the LLM inference provider.
//!
//! Concrete clients live in `labelbase-youtube` and `labelbase-gemini`.
//! The API layer only sees these traits, held as `Arc<dyn ...>`, so tests
//! can substitute in-process fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Video metadata
// ---------------------------------------------------------------------------

/// Metadata describing a single video, persisted as the `video_metadata`
/// JSON blob on the `videos` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    /// Canonical watch URL.
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub channel: Option<String>,
    pub channel_id: Option<String>,
    pub channel_logo: Option<String>,
    /// Raw ISO-8601 duration as reported by the provider (e.g. `PT4M13S`).
    pub duration: Option<String>,
    pub length_seconds: i64,
    pub views: i64,
    pub like_count: i64,
    pub comment_count: i64,
    /// `like_count / views * 5`, rounded to two decimals.
    pub rating: f64,
    pub publish_date: Option<Timestamp>,
    pub keywords: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub captions: bool,
    pub age_restricted: bool,
    pub privacy_status: Option<String>,
    pub metadata_fetched_at: Timestamp,
}

/// Failure classes of a metadata fetch. Only [`MetadataError::Transient`]
/// is worth retrying.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
    /// Network failure, rate limiting, or a provider-side 5xx.
    #[error("{0}")]
    Transient(String),

    /// The video does not exist, is not accessible, or the provider
    /// rejected the request outright.
    #[error("{0}")]
    Permanent(String),
}

impl MetadataError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[async_trait]
pub trait VideoMetadataProvider: Send + Sync {
    /// Fetch metadata for a single video id. One attempt; retrying is the
    /// caller's decision.
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata, MetadataError>;
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Input to a single LLM invocation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Video reference handed to the model (canonical watch URL).
    pub video_url: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
}

/// Token accounting reported alongside a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: i64, completion_tokens: i64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Whitespace word counts, for providers that do not report usage.
    pub fn approximate(prompt: &str, completion: &str) -> Self {
        Self::new(
            prompt.split_whitespace().count() as i64,
            completion.split_whitespace().count() as i64,
        )
    }
}

/// Generated text plus usage. This is what gets serialized into
/// `outputs.llm_output` and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct GenerationError(pub String);

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_total_is_sum() {
        let usage = TokenUsage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn approximate_usage_counts_words() {
        let usage = TokenUsage::approximate("Summarize this video", "It is about  Rust\nand SQL");
        assert_eq!(usage.prompt_tokens, 3);
        assert_eq!(usage.completion_tokens, 5);
        assert_eq!(usage.total_tokens, 8);
    }

    #[test]
    fn generation_result_serializes_with_snake_case_usage() {
        let result = GenerationResult {
            content: "hello".into(),
            model: "gemini-2.0-flash".into(),
            usage: TokenUsage::new(1, 2),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"], "hello");
        assert_eq!(json["usage"]["prompt_tokens"], 1);
        assert_eq!(json["usage"]["total_tokens"], 3);
    }

    #[test]
    fn only_transient_metadata_errors_retry() {
        assert!(MetadataError::Transient("429".into()).is_transient());
        assert!(!MetadataError::Permanent("not found".into()).is_transient());
    }
}
