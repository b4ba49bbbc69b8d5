use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use forum_types::api::{Envelope, MessageRequest, ReplyRequest};

use crate::error::{ApiError, ApiJson};
use crate::identity::Identity;
use crate::posts::parse_path_id;
use crate::state::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ApiJson(req): ApiJson<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .engine
        .send_direct_message(&identity.username, &req.to, &req.content)
        .map_err(ApiError::engine("Failed to send message"))?;
    debug!(message_id = %message.id, from = %message.from, to = %message.to, "direct message sent");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Message sent successfully", message)),
    ))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .engine
        .get_direct_messages(&identity.username)
        .map_err(ApiError::engine("Failed to get messages"))?;
    Ok(Json(Envelope::success(
        format!("{} messages", messages.len()),
        messages,
    )))
}

pub async fn reply_to_message(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(message_id): Path<String>,
    ApiJson(req): ApiJson<ReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = parse_path_id(&message_id, "message")?;
    let reply = state
        .engine
        .reply_to_direct_message(message_id, &identity.username, &req.content)
        .map_err(ApiError::engine("Failed to reply to message"))?;
    debug!(original = %message_id, reply_id = %reply.id, "direct message reply sent");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Reply sent successfully", reply)),
    ))
}
