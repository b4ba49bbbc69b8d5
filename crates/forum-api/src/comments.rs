use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use uuid::Uuid;

use forum_engine::{EngineError, EntityKind};
use forum_types::api::{CommentRequest, Envelope};

use crate::error::{ApiError, ApiJson};
use crate::identity::Identity;
use crate::posts::parse_path_id;
use crate::state::AppState;

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(post_id): Path<String>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_path_id(&post_id, "post")?;

    // A parent id that does not parse cannot name an existing comment.
    let parent_id = match req.parent_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
            ApiError::engine("Failed to add comment")(EngineError::not_found(
                EntityKind::ParentComment,
                raw,
            ))
        })?),
    };

    let comment = state
        .engine
        .add_comment(&req.content, &identity.username, post_id, parent_id)
        .map_err(ApiError::engine("Failed to add comment"))?;
    debug!(%post_id, comment_id = %comment.id, parent = ?comment.parent_id, "comment added");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Comment added successfully", comment)),
    ))
}

pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_path_id(&post_id, "post")?;
    let comments = state
        .engine
        .get_comments(post_id)
        .map_err(ApiError::engine("Failed to get comments"))?;
    Ok(Json(Envelope::success(
        format!("{} top-level comments", comments.len()),
        comments,
    )))
}
