//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `labelbase_db` (or to the
//! [`RunPromptOrchestrator`](crate::orchestrator::RunPromptOrchestrator))
//! and map errors via [`AppError`](crate::error::AppError).

pub mod prompts;
pub mod users;
pub mod videos;
