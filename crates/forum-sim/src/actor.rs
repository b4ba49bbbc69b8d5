use async_trait::async_trait;
use uuid::Uuid;

use forum_actor::EngineHandle;
use forum_types::models::StatsSnapshot;

use crate::ForumClient;

/// Simulated users talk straight to the engine actor.
#[async_trait]
impl ForumClient for EngineHandle {
    async fn register(&self, username: &str) -> anyhow::Result<()> {
        self.register_user(username, "password").await?;
        Ok(())
    }

    async fn create_subreddit(&self, creator: &str, name: &str, description: &str) -> anyhow::Result<()> {
        EngineHandle::create_subreddit(self, name, description, creator).await?;
        Ok(())
    }

    async fn join(&self, username: &str, subreddit: &str) -> anyhow::Result<()> {
        Ok(self.join_subreddit(username, subreddit).await?)
    }

    async fn leave(&self, username: &str, subreddit: &str) -> anyhow::Result<()> {
        Ok(self.leave_subreddit(username, subreddit).await?)
    }

    async fn create_post(&self, author: &str, subreddit: &str, title: &str, content: &str) -> anyhow::Result<Uuid> {
        let post = EngineHandle::create_post(self, title, content, author, subreddit).await?;
        Ok(post.id)
    }

    async fn vote_post(&self, _voter: &str, post_id: Uuid, upvote: bool) -> anyhow::Result<()> {
        EngineHandle::vote_post(self, post_id, upvote).await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        author: &str,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
    ) -> anyhow::Result<Uuid> {
        let comment = EngineHandle::add_comment(self, content, author, post_id, parent_id).await?;
        Ok(comment.id)
    }

    async fn send_dm(&self, from: &str, to: &str, content: &str) -> anyhow::Result<Uuid> {
        let message = self.send_direct_message(from, to, content).await?;
        Ok(message.id)
    }

    async fn reply_dm(&self, from: &str, message_id: Uuid, content: &str) -> anyhow::Result<()> {
        self.reply_to_direct_message(message_id, from, content).await?;
        Ok(())
    }

    async fn stats(&self) -> anyhow::Result<StatsSnapshot> {
        Ok(EngineHandle::stats(self).await?)
    }
}
