use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use forum_types::models::{
    Comment, DirectMessage, Post, StatsSnapshot, Subreddit, User, UserSummary,
};

use crate::command::Command;
use crate::{ActorError, TOP_USERS};

/// Cloneable async handle to the engine actor.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, ActorError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| ActorError::MailboxClosed)?;
        answer.await.map_err(|_| ActorError::MailboxClosed)
    }

    /// Asks the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| ActorError::MailboxClosed)
    }

    // -- Users --

    pub async fn register_user(&self, username: &str, password: &str) -> Result<User, ActorError> {
        let (username, password) = (username.to_string(), password.to_string());
        Ok(self
            .request(|reply| Command::RegisterUser { username, password, reply })
            .await??)
    }

    pub async fn get_user(&self, username: &str) -> Result<User, ActorError> {
        let username = username.to_string();
        Ok(self.request(|reply| Command::GetUser { username, reply }).await??)
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ActorError> {
        self.request(|reply| Command::ListUsers { reply }).await
    }

    // -- Subreddits --

    pub async fn create_subreddit(
        &self,
        name: &str,
        description: &str,
        creator: &str,
    ) -> Result<Subreddit, ActorError> {
        let (name, description, creator) = (name.to_string(), description.to_string(), creator.to_string());
        Ok(self
            .request(|reply| Command::CreateSubreddit { name, description, creator, reply })
            .await??)
    }

    pub async fn get_subreddit(&self, name: &str) -> Result<Subreddit, ActorError> {
        let name = name.to_string();
        Ok(self.request(|reply| Command::GetSubreddit { name, reply }).await??)
    }

    pub async fn join_subreddit(&self, username: &str, subreddit: &str) -> Result<(), ActorError> {
        let (username, subreddit) = (username.to_string(), subreddit.to_string());
        Ok(self
            .request(|reply| Command::JoinSubreddit { username, subreddit, reply })
            .await??)
    }

    pub async fn leave_subreddit(&self, username: &str, subreddit: &str) -> Result<(), ActorError> {
        let (username, subreddit) = (username.to_string(), subreddit.to_string());
        Ok(self
            .request(|reply| Command::LeaveSubreddit { username, subreddit, reply })
            .await??)
    }

    // -- Posts --

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        author: &str,
        subreddit: &str,
    ) -> Result<Post, ActorError> {
        let (title, content) = (title.to_string(), content.to_string());
        let (author, subreddit) = (author.to_string(), subreddit.to_string());
        Ok(self
            .request(|reply| Command::CreatePost { title, content, author, subreddit, reply })
            .await??)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, ActorError> {
        Ok(self.request(|reply| Command::GetPost { post_id, reply }).await??)
    }

    pub async fn vote_post(&self, post_id: Uuid, upvote: bool) -> Result<Post, ActorError> {
        Ok(self
            .request(|reply| Command::VotePost { post_id, upvote, reply })
            .await??)
    }

    pub async fn get_user_feed(&self, username: &str) -> Result<Vec<Post>, ActorError> {
        let username = username.to_string();
        Ok(self.request(|reply| Command::GetFeed { username, reply }).await??)
    }

    // -- Comments --

    pub async fn add_comment(
        &self,
        content: &str,
        author: &str,
        post_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Comment, ActorError> {
        let (content, author) = (content.to_string(), author.to_string());
        Ok(self
            .request(|reply| Command::AddComment { content, author, post_id, parent_id, reply })
            .await??)
    }

    pub async fn get_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ActorError> {
        Ok(self.request(|reply| Command::GetComments { post_id, reply }).await??)
    }

    // -- Direct messages --

    pub async fn send_direct_message(&self, from: &str, to: &str, content: &str) -> Result<DirectMessage, ActorError> {
        let (from, to, content) = (from.to_string(), to.to_string(), content.to_string());
        Ok(self
            .request(|reply| Command::SendDirectMessage { from, to, content, reply })
            .await??)
    }

    pub async fn reply_to_direct_message(
        &self,
        original_id: Uuid,
        from: &str,
        content: &str,
    ) -> Result<DirectMessage, ActorError> {
        let (from, content) = (from.to_string(), content.to_string());
        Ok(self
            .request(|reply| Command::ReplyToDirectMessage { original_id, from, content, reply })
            .await??)
    }

    pub async fn get_direct_messages(&self, username: &str) -> Result<Vec<DirectMessage>, ActorError> {
        let username = username.to_string();
        Ok(self
            .request(|reply| Command::GetDirectMessages { username, reply })
            .await??)
    }

    // -- Stats --

    /// Global counters with the top ten users by karma.
    pub async fn stats(&self) -> Result<StatsSnapshot, ActorError> {
        self.request(|reply| Command::GetStats { top_n: TOP_USERS, reply })
            .await
    }
}
