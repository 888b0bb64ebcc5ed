//! Repository for the `outputs` table.

use labelbase_core::types::DbId;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::output::{CreateOutput, Output};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, video_id, prompt_id, llm_output, run_date, time_to_generate";

/// Provides append/read operations for outputs. Outputs are never updated.
pub struct OutputRepo;

impl OutputRepo {
    /// Insert an output for a `(video, prompt)` pair.
    ///
    /// Returns `None` if an output for the pair already exists
    /// (`uq_outputs_video_prompt`); the existing row is left untouched.
    pub async fn create_if_absent<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateOutput,
    ) -> Result<Option<Output>, sqlx::Error> {
        let query = format!(
            "INSERT INTO outputs (id, video_id, prompt_id, llm_output, time_to_generate)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (video_id, prompt_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Output>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(input.video_id)
            .bind(&input.prompt_id)
            .bind(&input.llm_output)
            .bind(input.time_to_generate)
            .fetch_optional(executor)
            .await
    }

    /// The output previously generated for this prompt against this video.
    pub async fn find_by_video_and_prompt<'e, E: PgExecutor<'e>>(
        executor: E,
        video_id: DbId,
        prompt_id: &str,
    ) -> Result<Option<Output>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outputs WHERE video_id = $1 AND prompt_id = $2");
        sqlx::query_as::<_, Output>(&query)
            .bind(video_id)
            .bind(prompt_id)
            .fetch_optional(executor)
            .await
    }

    /// All outputs of a prompt, oldest first.
    pub async fn list_by_prompt<'e, E: PgExecutor<'e>>(
        executor: E,
        prompt_id: &str,
    ) -> Result<Vec<Output>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM outputs WHERE prompt_id = $1 ORDER BY run_date ASC");
        sqlx::query_as::<_, Output>(&query)
            .bind(prompt_id)
            .fetch_all(executor)
            .await
    }

    /// All outputs generated against a video, oldest first.
    pub async fn list_by_video<'e, E: PgExecutor<'e>>(
        executor: E,
        video_id: DbId,
    ) -> Result<Vec<Output>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM outputs WHERE video_id = $1 ORDER BY run_date ASC");
        sqlx::query_as::<_, Output>(&query)
            .bind(video_id)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM outputs")
            .fetch_one(executor)
            .await
    }
}
