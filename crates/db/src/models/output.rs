//! Output entity model and DTOs.
//!
//! Outputs are append-only: one row per successful generation for a
//! `(video_id, prompt_id)` pair, never updated afterwards.

use labelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `outputs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Output {
    pub id: String,
    pub video_id: DbId,
    pub prompt_id: String,
    /// Serialized generation result (`content`, `model`, `usage`).
    pub llm_output: serde_json::Value,
    pub run_date: Timestamp,
    /// Wall-clock generation time in seconds.
    pub time_to_generate: f64,
}

/// DTO for inserting an output. `run_date` defaults to `NOW()`.
#[derive(Debug, Clone)]
pub struct CreateOutput {
    pub video_id: DbId,
    pub prompt_id: String,
    pub llm_output: serde_json::Value,
    pub time_to_generate: f64,
}
