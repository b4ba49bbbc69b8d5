//! Owned snapshots of engine state.
//!
//! The engine never hands out its locked records; every read copies the
//! relevant fields into one of these types, which are then free to cross
//! threads, mailboxes and the HTTP boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub karma: i64,
    /// Joined subreddit names, sorted.
    pub subreddits: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub karma: i64,
    pub subreddits: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subreddit {
    pub name: String,
    pub description: String,
    pub creator: String,
    /// Post ids in insertion order.
    pub posts: Vec<Uuid>,
    /// Member usernames, sorted.
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub subreddit: String,
    pub votes: i64,
    /// Every comment under the post, replies included.
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
}

/// A comment together with its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub author: String,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    pub children: Vec<Comment>,
}

impl Comment {
    /// Number of comments in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Comment::subtree_len).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<DirectMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKarma {
    pub username: String,
    pub karma: i64,
}

/// Global counters gathered by walking the whole store.
///
/// Each entity is read under its own lock, but the walk as a whole is not
/// atomic: totals taken while mutations are in flight may describe a state
/// that never existed at a single instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_users: usize,
    pub total_subreddits: usize,
    pub total_posts: usize,
    pub total_comments: usize,
    pub total_direct_messages: usize,
    pub total_upvotes: i64,
    pub total_downvotes: i64,
    pub top_users: Vec<UserKarma>,
}
