use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prompts;
use crate::state::AppState;

/// Routes mounted at `/prompts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list_prompts).post(prompts::create_prompt))
        .route("/run_prompt", post(prompts::run_prompt))
        .route("/{id}", get(prompts::get_prompt))
}
