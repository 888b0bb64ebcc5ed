#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use labelbase_api::config::ServerConfig;
use labelbase_api::orchestrator::RunPromptOrchestrator;
use labelbase_api::router::build_app_router;
use labelbase_api::state::AppState;
use labelbase_core::providers::{
    GenerationError, GenerationProvider, GenerationRequest, GenerationResult, MetadataError,
    TokenUsage, VideoMetadata, VideoMetadataProvider,
};
use labelbase_core::retry::RetryPolicy;
use labelbase_core::video_url::canonical_url;
use labelbase_gemini::GeminiConfig;
use labelbase_youtube::YouTubeConfig;
use sqlx::PgPool;
use tokio::sync::Barrier;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fake providers
// ---------------------------------------------------------------------------

/// Metadata provider that counts calls and can fail a set number of times.
#[derive(Default)]
pub struct FakeMetadata {
    calls: AtomicU32,
    /// Number of leading calls that fail with a transient error.
    transient_failures: u32,
    /// When set, every call fails with a permanent error.
    permanent_failure: bool,
}

impl FakeMetadata {
    pub fn failing_transiently(times: u32) -> Self {
        Self {
            transient_failures: times,
            ..Default::default()
        }
    }

    pub fn failing_permanently() -> Self {
        Self {
            permanent_failure: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoMetadataProvider for FakeMetadata {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.permanent_failure {
            return Err(MetadataError::Permanent(format!("Video not found: {video_id}")));
        }
        if call <= self.transient_failures {
            return Err(MetadataError::Transient("HTTP 503".into()));
        }
        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            url: canonical_url(video_id),
            title: format!("Video {video_id}"),
            description: Some("Fetched description".into()),
            channel: Some("Test Channel".into()),
            channel_id: Some("UC123".into()),
            channel_logo: None,
            duration: Some("PT3M".into()),
            length_seconds: 180,
            views: 100,
            like_count: 10,
            comment_count: 1,
            rating: 0.5,
            publish_date: None,
            keywords: vec!["test".into()],
            thumbnail_url: None,
            captions: false,
            age_restricted: false,
            privacy_status: Some("public".into()),
            metadata_fetched_at: chrono::Utc::now(),
        })
    }
}

/// Generation provider that counts calls and echoes its input.
#[derive(Default)]
pub struct FakeGenerator {
    calls: AtomicU32,
    fail: bool,
    /// When set, each call waits until this many calls are in flight.
    barrier: Option<Barrier>,
}

impl FakeGenerator {
    /// Holds every call until `parties` calls have started, so concurrent
    /// runs all pass the stored-output check before any of them writes.
    pub fn synchronized(parties: usize) -> Self {
        Self {
            barrier: Some(Barrier::new(parties)),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for FakeGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail {
            return Err(GenerationError("Gemini API error (500): internal".into()));
        }
        let content = format!("Run {call}: {} on {}", request.prompt, request.video_url);
        Ok(GenerationResult {
            usage: TokenUsage::approximate(&request.prompt, &content),
            content,
            model: "fake-model".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        youtube: YouTubeConfig::new("test-youtube-key"),
        gemini: GeminiConfig::new("test-gemini-key"),
        metadata_retry: RetryPolicy::immediate(3),
    }
}

/// Build the full application router over the given pool and providers.
///
/// Uses the same middleware stack as production via `build_app_router`.
pub fn build_test_app_with(
    pool: PgPool,
    metadata: Arc<FakeMetadata>,
    generator: Arc<FakeGenerator>,
) -> Router {
    let config = test_config();
    let orchestrator =
        RunPromptOrchestrator::new(pool.clone(), metadata, generator, config.metadata_retry);
    let state = AppState {
        pool,
        orchestrator: Arc::new(orchestrator),
    };
    build_app_router(state, &config)
}

/// Build the application with well-behaved fake providers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        Arc::new(FakeMetadata::default()),
        Arc::new(FakeGenerator::default()),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}
