use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::create_video))
        .route("/{id}", get(videos::get_video))
        .route("/{id}/outputs", get(videos::list_video_outputs))
}
