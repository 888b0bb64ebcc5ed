//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use labelbase_core::error::CoreError;
use labelbase_core::types::DbId;
use labelbase_db::models::user::{CreateUser, UserResponse};
use labelbase_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// Create a user with an Argon2id-hashed password. Duplicate emails yield 409.
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::InvalidInput)?;

    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(CoreError::Conflict(format!("User with email {email} already exists")).into());
    }

    let hashed_password = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent insert still trips `uq_users_email`, which maps to 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            hashed_password,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;
    Ok(Json(user.into()))
}
