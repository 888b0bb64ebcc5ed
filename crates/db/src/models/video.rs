//! Video entity model and DTOs.

use labelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    /// External YouTube identifier, unique across the table.
    pub youtube_id: String,
    pub title: String,
    pub description: Option<String>,
    pub video_metadata: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a video.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub youtube_id: String,
    pub title: String,
    pub description: Option<String>,
    pub video_metadata: Option<serde_json::Value>,
    pub user_id: Option<DbId>,
}
