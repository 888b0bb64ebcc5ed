//! Repository for the `videos` table.

use labelbase_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::video::{CreateVideo, Video};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, youtube_id, title, description, video_metadata, user_id, created_at, updated_at";

/// Provides create/read operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video unless one with the same `youtube_id` already exists.
    ///
    /// Returns `None` when another writer got there first; callers should
    /// re-read with [`VideoRepo::find_by_youtube_id`].
    pub async fn create_if_absent<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (youtube_id, title, description, video_metadata, user_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (youtube_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(&input.youtube_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.video_metadata)
            .bind(input.user_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Look up a video by its external YouTube identifier.
    pub async fn find_by_youtube_id<'e, E: PgExecutor<'e>>(
        executor: E,
        youtube_id: &str,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE youtube_id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(youtube_id)
            .fetch_optional(executor)
            .await
    }

    /// List videos in insertion order with `OFFSET skip LIMIT limit`.
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY id ASC OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, Video>(&query)
            .bind(skip)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(executor)
            .await
    }
}
