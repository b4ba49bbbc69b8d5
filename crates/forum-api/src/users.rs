use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use forum_types::api::{Envelope, RegisterRequest, RegisterResponse};

use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = match req.username {
        Some(name) if name.trim().is_empty() => {
            return Err(ApiError::BadRequest("Username cannot be empty".into()));
        }
        Some(name) => name,
        None => state.next_generated_username(),
    };

    let user = state
        .engine
        .register_user(&username, &req.password)
        .map_err(ApiError::engine("Failed to register user"))?;
    info!(username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            format!("User {} registered successfully", user.username),
            RegisterResponse { username: user.username },
        )),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    let users = state.engine.list_users();
    Json(Envelope::success(format!("{} users", users.len()), users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .engine
        .get_user(&username)
        .map_err(ApiError::engine("Failed to get user"))?;
    Ok(Json(Envelope::success(format!("User {username}"), user)))
}
