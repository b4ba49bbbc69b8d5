//! Concurrent in-memory forum engine.
//!
//! # Locking
//!
//! Two levels. The store lock guards the top-level maps and is held only
//! long enough to resolve or insert entries; it is always released before
//! any entity lock is taken. Each entity sits behind its own `RwLock`.
//!
//! When an operation needs two entity locks at once it takes them in rank
//! order:
//!
//! ```text
//! Subreddit < Post < User < Inbox
//! ```
//!
//! Only membership changes nest (subreddit, then user). Voting touches the
//! post and then the author one after the other without nesting.

pub mod comments;
pub mod error;
pub mod feed;
pub mod membership;
pub mod messages;
pub mod stats;
pub mod store;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

pub use error::{EngineError, EntityKind, Result};

use crate::messages::Inbox;
use crate::store::{PostRecord, SubredditRecord, UserRecord};

pub(crate) type Shared<T> = Arc<RwLock<T>>;

/// Owner of all forum state. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct Engine {
    store: RwLock<Store>,
}

#[derive(Default)]
pub(crate) struct Store {
    pub(crate) users: HashMap<String, Shared<UserRecord>>,
    pub(crate) subreddits: HashMap<String, Shared<SubredditRecord>>,
    pub(crate) posts: HashMap<Uuid, Shared<PostRecord>>,
    pub(crate) inboxes: HashMap<String, Shared<Inbox>>,
    /// Top-level message id -> recipient whose inbox holds it.
    pub(crate) message_index: HashMap<Uuid, String>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn store(&self) -> RwLockReadGuard<'_, Store> {
        read(&self.store)
    }

    pub(crate) fn store_mut(&self) -> RwLockWriteGuard<'_, Store> {
        write(&self.store)
    }
}

// Writers never leave a record half-updated (counter bumps and single
// pushes), so a poisoned lock still guards consistent data.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

/// Net vote effect on a post counter.
pub(crate) fn vote_delta(upvote: bool) -> i64 {
    if upvote { 2 } else { -1 }
}

/// Karma effect on the author of a voted post.
pub(crate) fn karma_delta(upvote: bool) -> i64 {
    if upvote { 1 } else { -1 }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Engine;

    /// Engine with `alice` and `bob` registered and `science` created by alice.
    pub fn seeded() -> Engine {
        let engine = Engine::new();
        engine.register_user("alice", "pw").unwrap();
        engine.register_user("bob", "pw").unwrap();
        engine
            .create_subreddit("science", "All about science", "alice")
            .unwrap();
        engine
    }
}
