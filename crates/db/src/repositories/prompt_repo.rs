//! Repository for the `prompts` table.

use labelbase_core::prompt::content_hash;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::prompt::{CreatePrompt, Prompt};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, system_prompt, user_prompt, content_hash, user_id, created_at, updated_at";

/// Provides create/read operations for prompts.
pub struct PromptRepo;

impl PromptRepo {
    /// Insert a new prompt with a freshly generated opaque id.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreatePrompt,
    ) -> Result<Prompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompts (id, system_prompt, user_prompt, content_hash, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.system_prompt)
            .bind(&input.user_prompt)
            .bind(content_hash(&input.user_prompt))
            .bind(input.user_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &str,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prompts WHERE id = $1");
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the oldest prompt whose user text matches `text` exactly and
    /// which carries no system prompt.
    ///
    /// Filters on the indexed hash first, then compares the text itself.
    pub async fn find_reusable_by_text<'e, E: PgExecutor<'e>>(
        executor: E,
        text: &str,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts
             WHERE content_hash = $1
               AND user_prompt = $2
               AND (system_prompt IS NULL OR system_prompt = '')
             ORDER BY created_at ASC, id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(content_hash(text))
            .bind(text)
            .fetch_optional(executor)
            .await
    }

    /// Take a transaction-scoped advisory lock keyed on the hash of `text`.
    ///
    /// Serializes concurrent find-or-create of the same prompt text. Released
    /// on commit or rollback.
    pub async fn lock_text<'e, E: PgExecutor<'e>>(
        executor: E,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(content_hash(text))
            .execute(executor)
            .await?;
        Ok(())
    }

    /// List prompts in creation order with `OFFSET skip LIMIT limit`.
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Prompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompts ORDER BY created_at ASC, id ASC OFFSET $1 LIMIT $2"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(skip)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM prompts")
            .fetch_one(executor)
            .await
    }
}
