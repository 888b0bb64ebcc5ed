//! Run-prompt orchestrator.
//!
//! Coordinates video resolution (metadata fetch with retry), prompt reuse,
//! the stored-output short circuit, the LLM call, and persistence of the
//! result. Held in [`AppState`](crate::state::AppState) as an
//! `Arc<RunPromptOrchestrator>`.

use std::sync::Arc;
use std::time::Instant;

use labelbase_core::error::CoreError;
use labelbase_core::prompt::validate_prompt_text;
use labelbase_core::providers::{
    GenerationProvider, GenerationRequest, GenerationResult, MetadataError, VideoMetadata,
    VideoMetadataProvider,
};
use labelbase_core::retry::{retry, RetryPolicy};
use labelbase_core::types::DbId;
use labelbase_core::video_url::{canonical_url, extract_video_id};
use labelbase_db::models::output::{CreateOutput, Output};
use labelbase_db::models::prompt::{CreatePrompt, Prompt, PromptWithOutputs};
use labelbase_db::models::video::{CreateVideo, Video};
use labelbase_db::repositories::{OutputRepo, PromptRepo, UserRepo, VideoRepo};
use labelbase_db::DbPool;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};

/// Input to [`RunPromptOrchestrator::run`].
#[derive(Debug, Clone)]
pub struct RunPromptInput {
    pub video_url: String,
    pub prompt: String,
    /// Reuse a stored prompt instead of matching by text.
    pub prompt_id: Option<String>,
    pub user_id: Option<DbId>,
}

/// Result of a run: the prompt it was attributed to and the generation.
#[derive(Debug, Clone)]
pub struct RunPromptOutcome {
    pub prompt_id: String,
    pub output: GenerationResult,
    /// `true` when the result came from a stored output and no LLM call was made.
    pub cached: bool,
}

/// Input to [`RunPromptOrchestrator::create_and_run`].
#[derive(Debug, Clone)]
pub struct CreateAndRunInput {
    pub video_id: DbId,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub user_id: Option<DbId>,
}

/// Orchestrates a single run of a prompt against a video.
///
/// Lifecycle of [`run`](Self::run):
/// 1. Validate the prompt and parse the video URL (no network before this).
/// 2. Resolve the owning user and the prompt (by id, or by exact text).
/// 3. Resolve the video, fetching metadata with retry if it is new.
/// 4. Return the stored output if this (video, prompt) pair already ran.
/// 5. Call the LLM, timing the call.
/// 6. Write video, prompt, and output in one transaction.
pub struct RunPromptOrchestrator {
    pool: DbPool,
    metadata: Arc<dyn VideoMetadataProvider>,
    generator: Arc<dyn GenerationProvider>,
    retry_policy: RetryPolicy,
}

/// A video that is either already stored or fetched and waiting to be inserted.
enum ResolvedVideo {
    Stored(Video),
    Fetched(VideoMetadata),
}

impl RunPromptOrchestrator {
    pub fn new(
        pool: DbPool,
        metadata: Arc<dyn VideoMetadataProvider>,
        generator: Arc<dyn GenerationProvider>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            pool,
            metadata,
            generator,
            retry_policy,
        }
    }

    /// Run a prompt against a YouTube URL, reusing a stored output when one exists.
    pub async fn run(&self, input: &RunPromptInput) -> AppResult<RunPromptOutcome> {
        // 1. Input checks.
        validate_prompt_text(&input.prompt)?;
        let youtube_id = extract_video_id(&input.video_url)?;

        // 2. Owner and prompt.
        if let Some(user_id) = input.user_id {
            self.ensure_user_exists(user_id).await?;
        }

        let prompt = match &input.prompt_id {
            Some(prompt_id) => Some(
                PromptRepo::find_by_id(&self.pool, prompt_id)
                    .await?
                    .ok_or_else(|| CoreError::not_found("Prompt", prompt_id))?,
            ),
            None => PromptRepo::find_reusable_by_text(&self.pool, &input.prompt).await?,
        };

        // 3. Video.
        let video = match VideoRepo::find_by_youtube_id(&self.pool, &youtube_id).await? {
            Some(video) => ResolvedVideo::Stored(video),
            None => ResolvedVideo::Fetched(self.fetch_metadata_with_retry(&youtube_id).await?),
        };

        // 4. Stored output short circuit.
        if let (ResolvedVideo::Stored(video), Some(prompt)) = (&video, &prompt) {
            if let Some(output) =
                OutputRepo::find_by_video_and_prompt(&self.pool, video.id, &prompt.id).await?
            {
                tracing::info!(
                    video_id = video.id,
                    prompt_id = %prompt.id,
                    output_id = %output.id,
                    "Returning stored output"
                );
                return Ok(RunPromptOutcome {
                    prompt_id: prompt.id.clone(),
                    output: stored_result(&output)?,
                    cached: true,
                });
            }
        }

        // 5. Generate.
        let (system_prompt, prompt_text) = match &prompt {
            Some(p) => (p.system_prompt.clone(), p.user_prompt.clone()),
            None => (None, input.prompt.clone()),
        };
        let (result, elapsed) = self
            .generate(GenerationRequest {
                video_url: canonical_url(&youtube_id),
                system_prompt,
                prompt: prompt_text,
            })
            .await?;

        // 6. Persist.
        let mut tx = self.pool.begin().await?;

        let video_id = match video {
            ResolvedVideo::Stored(video) => video.id,
            ResolvedVideo::Fetched(metadata) => {
                let create = video_from_metadata(&metadata, None, input.user_id)?;
                insert_video(&mut tx, &create).await?.0.id
            }
        };

        let prompt_id = match prompt {
            Some(prompt) => prompt.id,
            None => {
                find_or_create_prompt(&mut tx, &input.prompt, input.user_id)
                    .await?
                    .id
            }
        };

        let output = insert_output(&mut tx, video_id, &prompt_id, &result, elapsed).await?;
        tx.commit().await?;

        tracing::info!(
            video_id,
            prompt_id = %prompt_id,
            output_id = %output.id,
            elapsed_ms = (elapsed * 1000.0) as u64,
            "Prompt run stored"
        );

        Ok(RunPromptOutcome {
            prompt_id,
            output: stored_result(&output)?,
            cached: false,
        })
    }

    /// Create a new prompt for an already stored video and run it immediately.
    ///
    /// Always creates a fresh prompt row; no text-based reuse.
    pub async fn create_and_run(&self, input: &CreateAndRunInput) -> AppResult<PromptWithOutputs> {
        validate_prompt_text(&input.user_prompt)?;

        let video = VideoRepo::find_by_id(&self.pool, input.video_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Video", input.video_id))?;

        if let Some(user_id) = input.user_id {
            self.ensure_user_exists(user_id).await?;
        }

        let system_prompt = input
            .system_prompt
            .clone()
            .filter(|s| !s.trim().is_empty());

        let (result, elapsed) = self
            .generate(GenerationRequest {
                video_url: canonical_url(&video.youtube_id),
                system_prompt: system_prompt.clone(),
                prompt: input.user_prompt.clone(),
            })
            .await?;

        let mut tx = self.pool.begin().await?;
        let prompt = PromptRepo::create(
            &mut *tx,
            &CreatePrompt {
                system_prompt,
                user_prompt: input.user_prompt.clone(),
                user_id: input.user_id,
            },
        )
        .await?;
        let output = insert_output(&mut tx, video.id, &prompt.id, &result, elapsed).await?;
        tx.commit().await?;

        tracing::info!(
            video_id = video.id,
            prompt_id = %prompt.id,
            elapsed_ms = (elapsed * 1000.0) as u64,
            "Prompt created and run"
        );

        Ok(PromptWithOutputs {
            prompt,
            outputs: vec![output],
        })
    }

    /// Fetch metadata for a video id, retrying transient provider failures
    /// according to the configured [`RetryPolicy`].
    pub async fn fetch_metadata_with_retry(&self, youtube_id: &str) -> AppResult<VideoMetadata> {
        let metadata = retry(&self.retry_policy, MetadataError::is_transient, |attempt| {
            tracing::debug!(video_id = youtube_id, attempt, "Fetching video metadata");
            self.metadata.fetch(youtube_id)
        })
        .await
        .map_err(|e| CoreError::UpstreamFetch(e.to_string()))?;
        Ok(metadata)
    }

    /// Fail with `NotFound` unless the user exists.
    pub async fn ensure_user_exists(&self, user_id: DbId) -> AppResult<()> {
        UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", user_id))?;
        Ok(())
    }

    /// Call the generation provider once. Returns the result and the elapsed
    /// wall-clock time in seconds.
    async fn generate(&self, request: GenerationRequest) -> AppResult<(GenerationResult, f64)> {
        let started = Instant::now();
        let result = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| CoreError::UpstreamGeneration(e.to_string()))?;
        Ok((result, started.elapsed().as_secs_f64()))
    }
}

/// Build the insert DTO for a freshly fetched video.
///
/// `extra` is caller-supplied metadata; fetched fields take precedence over it.
pub fn video_from_metadata(
    metadata: &VideoMetadata,
    extra: Option<&serde_json::Value>,
    user_id: Option<DbId>,
) -> AppResult<CreateVideo> {
    let fetched = serde_json::to_value(metadata)
        .map_err(|e| AppError::InternalError(format!("Failed to encode video metadata: {e}")))?;

    let video_metadata = match (extra, fetched) {
        (Some(serde_json::Value::Object(extra)), serde_json::Value::Object(fetched)) => {
            let mut merged = extra.clone();
            merged.extend(fetched);
            serde_json::Value::Object(merged)
        }
        (_, fetched) => fetched,
    };

    Ok(CreateVideo {
        youtube_id: metadata.video_id.clone(),
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        video_metadata: Some(video_metadata),
        user_id,
    })
}

/// Insert a video, or load the row a concurrent writer inserted first.
///
/// The flag is `true` when this call created the row.
pub async fn insert_video(conn: &mut PgConnection, input: &CreateVideo) -> AppResult<(Video, bool)> {
    if let Some(video) = VideoRepo::create_if_absent(&mut *conn, input).await? {
        tracing::info!(video_id = video.id, youtube_id = %video.youtube_id, "Video created");
        return Ok((video, true));
    }
    let video = VideoRepo::find_by_youtube_id(&mut *conn, &input.youtube_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Video {} vanished after conflicting insert",
                input.youtube_id
            ))
        })?;
    Ok((video, false))
}

/// Reuse the prompt a concurrent run created for the same text, or create it.
///
/// Holds a per-text advisory lock until the surrounding transaction ends, so
/// two first runs of one text end up on the same prompt row.
async fn find_or_create_prompt(
    conn: &mut PgConnection,
    text: &str,
    user_id: Option<DbId>,
) -> AppResult<Prompt> {
    PromptRepo::lock_text(&mut *conn, text).await?;

    if let Some(prompt) = PromptRepo::find_reusable_by_text(&mut *conn, text).await? {
        tracing::warn!(
            prompt_id = %prompt.id,
            "Prompt already created by a concurrent run, reusing it"
        );
        return Ok(prompt);
    }

    let prompt = PromptRepo::create(
        &mut *conn,
        &CreatePrompt {
            system_prompt: None,
            user_prompt: text.to_string(),
            user_id,
        },
    )
    .await?;
    Ok(prompt)
}

/// Insert an output, or return the one a concurrent run stored first.
async fn insert_output(
    conn: &mut PgConnection,
    video_id: DbId,
    prompt_id: &str,
    result: &GenerationResult,
    elapsed: f64,
) -> AppResult<Output> {
    let llm_output = serde_json::to_value(result)
        .map_err(|e| AppError::InternalError(format!("Failed to encode LLM output: {e}")))?;

    let create = CreateOutput {
        video_id,
        prompt_id: prompt_id.to_string(),
        llm_output,
        time_to_generate: elapsed,
    };

    if let Some(output) = OutputRepo::create_if_absent(&mut *conn, &create).await? {
        return Ok(output);
    }

    tracing::warn!(
        video_id,
        prompt_id,
        "Output already stored by a concurrent run, keeping the existing one"
    );
    OutputRepo::find_by_video_and_prompt(&mut *conn, video_id, prompt_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Output for video {video_id} and prompt {prompt_id} vanished after conflicting insert"
            ))
        })
}

/// Decode the generation result stored in an output row.
fn stored_result(output: &Output) -> AppResult<GenerationResult> {
    serde_json::from_value(output.llm_output.clone()).map_err(|e| {
        AppError::InternalError(format!("Stored output {} is malformed: {e}", output.id))
    })
}
