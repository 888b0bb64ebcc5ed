use std::sync::Arc;

use crate::orchestrator::RunPromptOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: labelbase_db::DbPool,
    /// Run-prompt workflow, holding the metadata and generation providers.
    pub orchestrator: Arc<RunPromptOrchestrator>,
}
