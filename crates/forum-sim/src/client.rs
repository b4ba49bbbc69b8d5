use anyhow::Context;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use forum_types::api::{
    CommentRequest, CreatePostRequest, CreateSubredditRequest, Envelope, MessageRequest,
    RegisterRequest, ReplyRequest, Status, VoteRequest,
};
use forum_types::models::{Comment, DirectMessage, Post, StatsSnapshot};

use crate::ForumClient;

/// HTTP client for a running forum server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post(&self, path: &str, username: &str) -> RequestBuilder {
        self.http.post(self.url(path)).header("Username", username)
    }

    /// Sends the request and unwraps the envelope. Non-2xx answers and
    /// error envelopes become errors carrying the server's message.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<Option<T>> {
        let response = request.send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("unreadable response body ({status})"))?;

        if !status.is_success() || envelope.status == Status::Error {
            anyhow::bail!("{} ({status})", envelope.message);
        }
        Ok(envelope.data)
    }

    async fn send_for<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        self.send(request).await?.context("response carried no data")
    }
}

#[async_trait]
impl ForumClient for ApiClient {
    async fn register(&self, username: &str) -> anyhow::Result<()> {
        let request = self.http.post(self.url("/api/register")).json(&RegisterRequest {
            username: Some(username.to_string()),
            password: "password".into(),
        });
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn create_subreddit(&self, creator: &str, name: &str, description: &str) -> anyhow::Result<()> {
        let request = self.post("/api/subreddits", creator).json(&CreateSubredditRequest {
            name: name.to_string(),
            description: description.to_string(),
        });
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn join(&self, username: &str, subreddit: &str) -> anyhow::Result<()> {
        let request = self.post(&format!("/api/subreddits/{subreddit}/join"), username);
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn leave(&self, username: &str, subreddit: &str) -> anyhow::Result<()> {
        let request = self.post(&format!("/api/subreddits/{subreddit}/leave"), username);
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn create_post(&self, author: &str, subreddit: &str, title: &str, content: &str) -> anyhow::Result<Uuid> {
        let request = self.post("/api/posts", author).json(&CreatePostRequest {
            title: title.to_string(),
            content: content.to_string(),
            subreddit: subreddit.to_string(),
        });
        let post: Post = self.send_for(request).await?;
        Ok(post.id)
    }

    async fn vote_post(&self, voter: &str, post_id: Uuid, upvote: bool) -> anyhow::Result<()> {
        let request = self
            .post(&format!("/api/posts/{post_id}/vote"), voter)
            .json(&VoteRequest { upvote });
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        author: &str,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
    ) -> anyhow::Result<Uuid> {
        let request = self
            .post(&format!("/api/posts/{post_id}/comments"), author)
            .json(&CommentRequest {
                content: content.to_string(),
                parent_id: parent_id.map(|id| id.to_string()),
            });
        let comment: Comment = self.send_for(request).await?;
        Ok(comment.id)
    }

    async fn send_dm(&self, from: &str, to: &str, content: &str) -> anyhow::Result<Uuid> {
        let request = self.post("/api/messages", from).json(&MessageRequest {
            to: to.to_string(),
            content: content.to_string(),
        });
        let message: DirectMessage = self.send_for(request).await?;
        Ok(message.id)
    }

    async fn reply_dm(&self, from: &str, message_id: Uuid, content: &str) -> anyhow::Result<()> {
        let request = self
            .post(&format!("/api/messages/{message_id}/reply"), from)
            .json(&ReplyRequest {
                content: content.to_string(),
            });
        self.send::<Value>(request).await?;
        Ok(())
    }

    async fn stats(&self) -> anyhow::Result<StatsSnapshot> {
        self.send_for(self.http.get(self.url("/api/stats"))).await
    }
}
