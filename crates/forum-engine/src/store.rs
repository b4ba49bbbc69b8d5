use std::collections::BTreeSet;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use forum_types::models::{Post, Subreddit, User, UserSummary};

use crate::comments::CommentTable;
use crate::{Engine, EngineError, EntityKind, Result, Shared, read, shared, write};

pub(crate) struct UserRecord {
    pub(crate) username: String,
    // Opaque; nothing in the engine reads it back.
    #[allow(dead_code)]
    pub(crate) password: String,
    pub(crate) karma: i64,
    pub(crate) subreddits: BTreeSet<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl UserRecord {
    pub(crate) fn snapshot(&self) -> User {
        User {
            username: self.username.clone(),
            karma: self.karma,
            subreddits: self.subreddits.iter().cloned().collect(),
            created_at: self.created_at,
        }
    }

    pub(crate) fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            karma: self.karma,
            subreddits: self.subreddits.len(),
            created_at: self.created_at,
        }
    }
}

pub(crate) struct SubredditRecord {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) creator: String,
    pub(crate) posts: Vec<Shared<PostRecord>>,
    pub(crate) members: BTreeSet<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl SubredditRecord {
    // Post ids are immutable, but reading them still takes each post's lock
    // briefly. Callers must not hold the subreddit lock while doing so.
    fn snapshot(&self, post_ids: Vec<Uuid>) -> Subreddit {
        Subreddit {
            name: self.name.clone(),
            description: self.description.clone(),
            creator: self.creator.clone(),
            posts: post_ids,
            members: self.members.iter().cloned().collect(),
            created_at: self.created_at,
        }
    }
}

pub(crate) struct PostRecord {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) subreddit: String,
    pub(crate) votes: i64,
    pub(crate) comments: CommentTable,
    pub(crate) created_at: DateTime<Utc>,
}

impl PostRecord {
    pub(crate) fn snapshot(&self) -> Post {
        Post {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            subreddit: self.subreddit.clone(),
            votes: self.votes,
            comment_count: self.comments.len(),
            created_at: self.created_at,
        }
    }
}

fn require_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidState(format!("{what} cannot be empty")));
    }
    Ok(())
}

impl Engine {
    // -- Users --

    pub fn register_user(&self, username: &str, password: &str) -> Result<User> {
        require_name("username", username)?;

        let record = UserRecord {
            username: username.to_string(),
            password: password.to_string(),
            karma: 0,
            subreddits: BTreeSet::new(),
            created_at: Utc::now(),
        };
        let user = record.snapshot();

        match self.store_mut().users.entry(username.to_string()) {
            Entry::Occupied(_) => return Err(EngineError::already_exists(EntityKind::User, username)),
            Entry::Vacant(slot) => {
                slot.insert(shared(record));
            }
        }

        debug!(username = %username, "registered user");
        Ok(user)
    }

    pub fn get_user(&self, username: &str) -> Result<User> {
        let user = self.user_record(username, EntityKind::User)?;
        let snapshot = read(&user).snapshot();
        Ok(snapshot)
    }

    /// Every registered user, sorted by username.
    pub fn list_users(&self) -> Vec<UserSummary> {
        let users: Vec<Shared<UserRecord>> = self.store().users.values().cloned().collect();

        let mut summaries: Vec<UserSummary> = users.iter().map(|u| read(u).summary()).collect();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        summaries
    }

    pub(crate) fn user_record(&self, username: &str, kind: EntityKind) -> Result<Shared<UserRecord>> {
        self.store()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| EngineError::not_found(kind, username))
    }

    // -- Subreddits --

    pub fn create_subreddit(&self, name: &str, description: &str, creator: &str) -> Result<Subreddit> {
        require_name("subreddit name", name)?;

        let record = SubredditRecord {
            name: name.to_string(),
            description: description.to_string(),
            creator: creator.to_string(),
            posts: Vec::new(),
            members: BTreeSet::new(),
            created_at: Utc::now(),
        };
        let subreddit = record.snapshot(Vec::new());

        match self.store_mut().subreddits.entry(name.to_string()) {
            Entry::Occupied(_) => {
                return Err(EngineError::already_exists(EntityKind::Subreddit, name));
            }
            Entry::Vacant(slot) => {
                slot.insert(shared(record));
            }
        }

        debug!(subreddit = %name, creator = %creator, "created subreddit");
        Ok(subreddit)
    }

    pub fn get_subreddit(&self, name: &str) -> Result<Subreddit> {
        let subreddit = self.subreddit_record(name)?;

        let (posts, partial) = {
            let guard = read(&subreddit);
            let partial = guard.snapshot(Vec::new());
            (guard.posts.clone(), partial)
        };

        let post_ids = posts.iter().map(|p| read(p).id).collect();
        Ok(Subreddit {
            posts: post_ids,
            ..partial
        })
    }

    pub(crate) fn subreddit_record(&self, name: &str) -> Result<Shared<SubredditRecord>> {
        self.store()
            .subreddits
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Subreddit, name))
    }

    // -- Posts --

    /// Publishes a post and appends it to its subreddit. The author is not
    /// checked against the user map.
    pub fn create_post(&self, title: &str, content: &str, author: &str, subreddit: &str) -> Result<Post> {
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            subreddit: subreddit.to_string(),
            votes: 0,
            comments: CommentTable::default(),
            created_at: Utc::now(),
        };
        let post = record.snapshot();
        let record = shared(record);

        let owner = {
            let mut store = self.store_mut();
            let owner = store
                .subreddits
                .get(subreddit)
                .cloned()
                .ok_or_else(|| EngineError::not_found(EntityKind::Subreddit, subreddit))?;
            store.posts.insert(post.id, Arc::clone(&record));
            owner
        };

        write(&owner).posts.push(record);

        debug!(post_id = %post.id, author = %author, subreddit = %subreddit, "created post");
        Ok(post)
    }

    pub fn get_post(&self, id: Uuid) -> Result<Post> {
        let post = self.post_record(id)?;
        let snapshot = read(&post).snapshot();
        Ok(snapshot)
    }

    pub(crate) fn post_record(&self, id: Uuid) -> Result<Shared<PostRecord>> {
        self.store()
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(EntityKind::Post, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded;

    #[test]
    fn register_twice_fails_and_fresh_user_is_empty() {
        let engine = Engine::new();
        let user = engine.register_user("alice", "secret").unwrap();
        assert_eq!(user.karma, 0);
        assert!(user.subreddits.is_empty());

        let err = engine.register_user("alice", "other").unwrap_err();
        assert_eq!(err, EngineError::already_exists(EntityKind::User, "alice"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let engine = Engine::new();
        assert!(matches!(
            engine.register_user("  ", "pw"),
            Err(EngineError::InvalidState(_))
        ));
        assert!(matches!(
            engine.create_subreddit("", "d", "alice"),
            Err(EngineError::InvalidState(_))
        ));
    }

    #[test]
    fn duplicate_subreddit_is_rejected() {
        let engine = seeded();
        let err = engine.create_subreddit("science", "again", "bob").unwrap_err();
        assert_eq!(err.kind(), Some(EntityKind::Subreddit));
        assert!(matches!(err, EngineError::AlreadyExists { .. }));
    }

    #[test]
    fn post_lands_in_map_and_subreddit() {
        let engine = seeded();
        let post = engine.create_post("H", "C", "alice", "science").unwrap();

        assert_eq!(engine.get_post(post.id).unwrap(), post);
        assert_eq!(engine.get_subreddit("science").unwrap().posts, vec![post.id]);
    }

    #[test]
    fn post_into_missing_subreddit_fails() {
        let engine = seeded();
        let err = engine.create_post("H", "C", "alice", "nope").unwrap_err();
        assert_eq!(err, EngineError::not_found(EntityKind::Subreddit, "nope"));
        assert_eq!(engine.stats(10).total_posts, 0);
    }

    #[test]
    fn lookups_report_not_found() {
        let engine = Engine::new();
        assert_eq!(
            engine.get_user("ghost").unwrap_err().kind(),
            Some(EntityKind::User)
        );
        assert_eq!(
            engine.get_subreddit("ghost").unwrap_err().kind(),
            Some(EntityKind::Subreddit)
        );
        assert_eq!(
            engine.get_post(Uuid::new_v4()).unwrap_err().kind(),
            Some(EntityKind::Post)
        );
    }

    #[test]
    fn list_users_is_sorted() {
        let engine = Engine::new();
        for name in ["carol", "alice", "bob"] {
            engine.register_user(name, "pw").unwrap();
        }
        let names: Vec<String> = engine.list_users().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }
}
