pub mod health;
pub mod prompts;
pub mod users;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                         list, create (GET, POST)
/// /videos/{id}                    get
/// /videos/{id}/outputs            outputs generated for a video
///
/// /prompts                        list, create and run (GET, POST)
/// /prompts/run_prompt             run a prompt against a video URL (POST)
/// /prompts/{id}                   get, with outputs
///
/// /users                          create (POST)
/// /users/{id}                     get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/videos", videos::router())
        .nest("/prompts", prompts::router())
        .nest("/users", users::router())
}
