use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Header naming the acting user. There are no credentials; the name is
/// taken at face value.
pub static USERNAME_HEADER: HeaderName = HeaderName::from_static("username");

#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

/// Reads the `Username` header into an [`Identity`] extension.
pub async fn require_username(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let username = req
        .headers()
        .get(&USERNAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Username header is required".into()))?
        .to_string();

    req.extensions_mut().insert(Identity { username });
    Ok(next.run(req).await)
}
