use serde::{Deserialize, Serialize};

// -- Envelope --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Shape of every HTTP response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }
}

// -- Users --

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Omitted usernames are generated by the server.
    #[serde(default)]
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub username: String,
}

// -- Subreddits --

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubredditRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// -- Posts --

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub subreddit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub upvote: bool,
}

// -- Comments --

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    /// Absent or empty means a top-level comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

// -- Direct messages --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRequest {
    pub to: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

