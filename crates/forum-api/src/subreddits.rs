use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use forum_types::api::{CreateSubredditRequest, Envelope};

use crate::error::{ApiError, ApiJson};
use crate::identity::Identity;
use crate::state::AppState;

pub async fn create_subreddit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<CreateSubredditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subreddit = state
        .engine
        .create_subreddit(&req.name, &req.description, &identity.username)
        .map_err(ApiError::engine("Failed to create subreddit"))?;
    info!(subreddit = %subreddit.name, creator = %identity.username, "subreddit created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            format!("Subreddit {} created successfully", subreddit.name),
            subreddit,
        )),
    ))
}

pub async fn get_subreddit(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subreddit = state
        .engine
        .get_subreddit(&name)
        .map_err(ApiError::engine("Failed to get subreddit"))?;
    Ok(Json(Envelope::success(format!("Subreddit {name}"), subreddit)))
}

pub async fn join_subreddit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .engine
        .join_subreddit(&identity.username, &name)
        .map_err(ApiError::engine("Failed to join subreddit"))?;
    Ok(Json(Envelope::ok(format!("Joined subreddit {name}"))))
}

pub async fn leave_subreddit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .engine
        .leave_subreddit(&identity.username, &name)
        .map_err(ApiError::engine("Failed to leave subreddit"))?;
    Ok(Json(Envelope::ok(format!("Left subreddit {name}"))))
}
