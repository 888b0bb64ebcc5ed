//! Handlers for the `/prompts` resource, including `run_prompt`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use labelbase_core::error::CoreError;
use labelbase_core::providers::GenerationResult;
use labelbase_core::types::DbId;
use labelbase_db::models::prompt::{Prompt, PromptWithOutputs};
use labelbase_db::repositories::{OutputRepo, PromptRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::orchestrator::{CreateAndRunInput, RunPromptInput};
use crate::query::PaginationParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /prompts/run_prompt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPromptRequest {
    pub video_url: String,
    pub prompt: String,
    pub prompt_id: Option<String>,
    pub user_id: Option<DbId>,
}

/// Response body for `POST /prompts/run_prompt`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPromptResponse {
    pub prompt_id: String,
    pub output: GenerationResult,
}

/// Request body for `POST /prompts`.
#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    pub video_id: DbId,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub user_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/prompts/run_prompt
///
/// Run a prompt against a YouTube URL. Identical (video, prompt text) pairs
/// return the stored output without calling the LLM again.
pub async fn run_prompt(
    State(state): State<AppState>,
    AppJson(input): AppJson<RunPromptRequest>,
) -> AppResult<Json<RunPromptResponse>> {
    let outcome = state
        .orchestrator
        .run(&RunPromptInput {
            video_url: input.video_url,
            prompt: input.prompt,
            prompt_id: input.prompt_id,
            user_id: input.user_id,
        })
        .await?;

    tracing::debug!(
        prompt_id = %outcome.prompt_id,
        cached = outcome.cached,
        "Run prompt completed"
    );

    Ok(Json(RunPromptResponse {
        prompt_id: outcome.prompt_id,
        output: outcome.output,
    }))
}

/// POST /api/prompts
///
/// Create a prompt for a stored video and run it immediately.
pub async fn create_prompt(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePromptRequest>,
) -> AppResult<(StatusCode, Json<PromptWithOutputs>)> {
    let created = state
        .orchestrator
        .create_and_run(&CreateAndRunInput {
            video_id: input.video_id,
            system_prompt: input.system_prompt,
            user_prompt: input.user_prompt,
            user_id: input.user_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/prompts/{id}
///
/// Returns the prompt together with every output generated from it.
pub async fn get_prompt(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<PromptWithOutputs>> {
    let prompt = PromptRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Prompt", &id))?;
    let outputs = OutputRepo::list_by_prompt(&state.pool, &prompt.id).await?;
    Ok(Json(PromptWithOutputs { prompt, outputs }))
}

/// GET /api/prompts?skip=&limit=
pub async fn list_prompts(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Vec<Prompt>>> {
    let (skip, limit) = params.resolve();
    let prompts = PromptRepo::list(&state.pool, skip, limit).await?;
    Ok(Json(prompts))
}
