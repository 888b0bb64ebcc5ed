//! Handlers for the `/videos` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use labelbase_core::error::CoreError;
use labelbase_core::types::DbId;
use labelbase_core::video_url::extract_video_id;
use labelbase_db::models::output::Output;
use labelbase_db::models::video::Video;
use labelbase_db::repositories::{OutputRepo, VideoRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::orchestrator::{insert_video, video_from_metadata};
use crate::query::PaginationParams;
use crate::state::AppState;

/// Request body for `POST /videos`.
///
/// `title` and `description` are fallbacks used only when the fetched
/// metadata leaves them empty. `metadata` is merged under the fetched blob.
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}

/// POST /api/videos
///
/// Returns the stored video (200) if the URL's video id is already known;
/// otherwise fetches metadata, stores a new video, and returns 201.
pub async fn create_video(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<Video>)> {
    let youtube_id = extract_video_id(&input.url)?;

    if let Some(video) = VideoRepo::find_by_youtube_id(&state.pool, &youtube_id).await? {
        return Ok((StatusCode::OK, Json(video)));
    }

    if let Some(user_id) = input.user_id {
        state.orchestrator.ensure_user_exists(user_id).await?;
    }

    let metadata = state
        .orchestrator
        .fetch_metadata_with_retry(&youtube_id)
        .await?;

    let mut create = video_from_metadata(&metadata, input.metadata.as_ref(), input.user_id)?;
    if create.title.trim().is_empty() {
        create.title = input.title;
    }
    if create.description.is_none() {
        create.description = input.description;
    }

    let mut conn = state.pool.acquire().await?;
    let (video, created) = insert_video(&mut conn, &create).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(video)))
}

/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Video>> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Video", id))?;
    Ok(Json(video))
}

/// GET /api/videos?skip=&limit=
pub async fn list_videos(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Vec<Video>>> {
    let (skip, limit) = params.resolve();
    let videos = VideoRepo::list(&state.pool, skip, limit).await?;
    Ok(Json(videos))
}

/// GET /api/videos/{id}/outputs
pub async fn list_video_outputs(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Vec<Output>>> {
    VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Video", id))?;
    let outputs = OutputRepo::list_by_video(&state.pool, id).await?;
    Ok(Json(outputs))
}
