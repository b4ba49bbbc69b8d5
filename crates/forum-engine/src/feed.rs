use forum_types::models::Post;

use crate::{Engine, EntityKind, Result, Shared, read};
use crate::store::{PostRecord, SubredditRecord};

impl Engine {
    /// Posts of every subreddit the user has joined, newest first.
    ///
    /// The sort is stable, so posts sharing a timestamp keep their
    /// subreddit/insertion order.
    pub fn get_user_feed(&self, username: &str) -> Result<Vec<Post>> {
        let user = self.user_record(username, EntityKind::User)?;
        let joined: Vec<String> = read(&user).subreddits.iter().cloned().collect();

        let communities: Vec<Shared<SubredditRecord>> = {
            let store = self.store();
            joined
                .iter()
                .filter_map(|name| store.subreddits.get(name).cloned())
                .collect()
        };

        let posts: Vec<Shared<PostRecord>> = communities
            .iter()
            .flat_map(|c| read(c).posts.clone())
            .collect();

        let mut feed: Vec<Post> = posts.iter().map(|p| read(p).snapshot()).collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::*;
    use crate::test_support::seeded;

    #[test]
    fn feed_is_union_of_joined_subreddits_newest_first() {
        let engine = seeded();
        engine.create_subreddit("books", "Reading", "bob").unwrap();
        engine.create_subreddit("gaming", "Games", "bob").unwrap();
        engine.join_subreddit("bob", "science").unwrap();
        engine.join_subreddit("bob", "books").unwrap();

        let mut expected = HashSet::new();
        for i in 0..4 {
            expected.insert(engine.create_post(&format!("s{i}"), "", "alice", "science").unwrap().id);
            expected.insert(engine.create_post(&format!("b{i}"), "", "alice", "books").unwrap().id);
            engine.create_post(&format!("g{i}"), "", "alice", "gaming").unwrap();
        }

        let feed = engine.get_user_feed("bob").unwrap();
        let ids: Vec<Uuid> = feed.iter().map(|p| p.id).collect();
        let unique: HashSet<Uuid> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 8);
        assert_eq!(unique, expected);
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn feed_follows_membership() {
        let engine = seeded();
        engine.create_post("H", "C", "alice", "science").unwrap();
        assert!(engine.get_user_feed("bob").unwrap().is_empty());

        engine.join_subreddit("bob", "science").unwrap();
        assert_eq!(engine.get_user_feed("bob").unwrap().len(), 1);

        engine.leave_subreddit("bob", "science").unwrap();
        assert!(engine.get_user_feed("bob").unwrap().is_empty());
    }

    #[test]
    fn feed_for_unknown_user_fails() {
        let engine = seeded();
        assert_eq!(
            engine.get_user_feed("ghost").unwrap_err().kind(),
            Some(EntityKind::User)
        );
    }
}
