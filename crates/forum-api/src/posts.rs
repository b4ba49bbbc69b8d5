use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};
use uuid::Uuid;

use forum_types::api::{CreatePostRequest, Envelope, VoteRequest};

use crate::error::{ApiError, ApiJson};
use crate::identity::Identity;
use crate::state::AppState;

/// Parses an id taken from the URL path.
pub(crate) fn parse_path_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what} id: {raw}")))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .engine
        .create_post(&req.title, &req.content, &identity.username, &req.subreddit)
        .map_err(ApiError::engine("Failed to create post"))?;
    info!(post_id = %post.id, subreddit = %post.subreddit, author = %post.author, "post created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Post created successfully", post)),
    ))
}

pub async fn get_feed(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let feed = state
        .engine
        .get_user_feed(&identity.username)
        .map_err(ApiError::engine("Failed to get feed"))?;
    Ok(Json(Envelope::success(
        format!("{} posts in feed", feed.len()),
        feed,
    )))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_path_id(&post_id, "post")?;
    let post = state
        .engine
        .get_post(post_id)
        .map_err(ApiError::engine("Failed to get post"))?;
    Ok(Json(Envelope::success(format!("Post {post_id}"), post)))
}

pub async fn vote_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_path_id(&post_id, "post")?;
    let post = state
        .engine
        .vote_post(post_id, req.upvote)
        .map_err(ApiError::engine("Failed to vote on post"))?;
    debug!(%post_id, voter = %identity.username, upvote = req.upvote, votes = post.votes, "post voted");

    let verb = if req.upvote { "upvoted" } else { "downvoted" };
    Ok(Json(Envelope::success(format!("Post {verb}"), post)))
}
