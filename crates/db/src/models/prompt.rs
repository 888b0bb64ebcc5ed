//! Prompt entity model and DTOs.

use labelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::output::Output;

/// A row from the `prompts` table. `id` is an opaque UUID string.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: String,
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    /// SHA-256 of `user_prompt`; internal lookup key.
    #[serde(skip_serializing)]
    pub content_hash: String,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a prompt. The id and content hash are derived on insert.
#[derive(Debug, Clone)]
pub struct CreatePrompt {
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    pub user_id: Option<DbId>,
}

/// A prompt together with every output produced from it.
#[derive(Debug, Clone, Serialize)]
pub struct PromptWithOutputs {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub outputs: Vec<Output>,
}
