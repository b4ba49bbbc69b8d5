use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use forum_engine::EngineError;
use forum_types::api::Envelope;

/// Failure of a request, rendered as an error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Engine {
        context: &'static str,
        source: EngineError,
    },

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Wraps an engine error with what the handler was trying to do.
    pub fn engine(context: &'static str) -> impl FnOnce(EngineError) -> Self {
        move |source| Self::Engine { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Engine { source, .. } => match source {
                EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
                EngineError::AlreadyExists { .. } => StatusCode::CONFLICT,
                EngineError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request format: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!(%status, "{self}");
        }
        (status, Json(Envelope::error(self.to_string()))).into_response()
    }
}

/// `Json` body extractor whose rejection is an [`ApiError`] envelope
/// instead of axum's plain-text body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_engine::EntityKind;

    #[test]
    fn engine_errors_map_to_statuses() {
        let not_found = ApiError::engine("Failed to join subreddit")(EngineError::not_found(
            EntityKind::Subreddit,
            "nowhere",
        ));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert!(not_found.to_string().starts_with("Failed to join subreddit: "));

        let taken = ApiError::engine("Failed to register user")(EngineError::already_exists(
            EntityKind::User,
            "alice",
        ));
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let blank = ApiError::engine("Failed to create subreddit")(EngineError::InvalidState(
            "blank".into(),
        ));
        assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
