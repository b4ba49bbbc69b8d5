//! Workload generator for the forum.
//!
//! Drives a [`ForumClient`] with a crowd of simulated users whose activity
//! follows a Zipf curve. The same workload runs against the in-process
//! actor or a live HTTP server.

mod actor;
pub mod client;
pub mod config;
pub mod runner;
pub mod zipf;

use async_trait::async_trait;
use uuid::Uuid;

use forum_types::models::StatsSnapshot;

pub use client::ApiClient;
pub use config::{SimConfig, SimTarget};
pub use runner::{SimReport, Simulator};

/// The forum operations the simulator needs, independent of transport.
#[async_trait]
pub trait ForumClient: Send + Sync {
    async fn register(&self, username: &str) -> anyhow::Result<()>;

    async fn create_subreddit(&self, creator: &str, name: &str, description: &str) -> anyhow::Result<()>;

    async fn join(&self, username: &str, subreddit: &str) -> anyhow::Result<()>;

    async fn leave(&self, username: &str, subreddit: &str) -> anyhow::Result<()>;

    async fn create_post(&self, author: &str, subreddit: &str, title: &str, content: &str) -> anyhow::Result<Uuid>;

    async fn vote_post(&self, voter: &str, post_id: Uuid, upvote: bool) -> anyhow::Result<()>;

    async fn add_comment(
        &self,
        author: &str,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
    ) -> anyhow::Result<Uuid>;

    async fn send_dm(&self, from: &str, to: &str, content: &str) -> anyhow::Result<Uuid>;

    async fn reply_dm(&self, from: &str, message_id: Uuid, content: &str) -> anyhow::Result<()>;

    async fn stats(&self) -> anyhow::Result<StatsSnapshot>;
}
