use forum_types::models::{StatsSnapshot, UserKarma};

use crate::{Engine, read};

impl Engine {
    /// Walks the whole store and returns global counters with the `top_n`
    /// users by karma.
    ///
    /// Only the map contents are captured under the store lock; each entity
    /// is then read under its own lock. The result is consistent per entity
    /// but not across entities while writers are active.
    pub fn stats(&self, top_n: usize) -> StatsSnapshot {
        let (users, subreddit_count, posts, inboxes) = {
            let store = self.store();
            (
                store.users.values().cloned().collect::<Vec<_>>(),
                store.subreddits.len(),
                store.posts.values().cloned().collect::<Vec<_>>(),
                store.inboxes.values().cloned().collect::<Vec<_>>(),
            )
        };

        let mut snapshot = StatsSnapshot {
            total_users: users.len(),
            total_subreddits: subreddit_count,
            total_posts: posts.len(),
            ..StatsSnapshot::default()
        };

        // Net counters: a post counts toward upvotes or downvotes as a whole.
        for post in &posts {
            let post = read(post);
            snapshot.total_comments += post.comments.len();
            if post.votes > 0 {
                snapshot.total_upvotes += post.votes;
            } else {
                snapshot.total_downvotes -= post.votes;
            }
        }

        let mut ranking: Vec<UserKarma> = users
            .iter()
            .map(|user| {
                let user = read(user);
                UserKarma {
                    username: user.username.clone(),
                    karma: user.karma,
                }
            })
            .collect();
        ranking.sort_by(|a, b| b.karma.cmp(&a.karma).then_with(|| a.username.cmp(&b.username)));
        ranking.truncate(top_n);
        snapshot.top_users = ranking;

        snapshot.total_direct_messages = inboxes.iter().map(|i| read(i).messages.len()).sum();

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded;

    #[test]
    fn empty_engine_has_zero_stats() {
        assert_eq!(Engine::new().stats(5), StatsSnapshot::default());
    }

    #[test]
    fn totals_cover_every_entity() {
        let engine = seeded();
        let up = engine.create_post("up", "", "alice", "science").unwrap();
        let down = engine.create_post("down", "", "bob", "science").unwrap();

        engine.vote_post(up.id, true).unwrap();
        engine.vote_post(up.id, false).unwrap();
        engine.vote_post(down.id, false).unwrap();
        engine.vote_post(down.id, false).unwrap();

        let root = engine.add_comment("a", "bob", up.id, None).unwrap();
        engine.add_comment("b", "alice", up.id, Some(root.id)).unwrap();
        engine.add_comment("c", "alice", down.id, None).unwrap();

        let dm = engine.send_direct_message("alice", "bob", "hi").unwrap();
        engine.send_direct_message("bob", "alice", "yo").unwrap();
        engine.reply_to_direct_message(dm.id, "bob", "hello").unwrap();

        let stats = engine.stats(10);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_subreddits, 1);
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.total_comments, 3);
        assert_eq!(stats.total_direct_messages, 2);
        assert_eq!(stats.total_upvotes, 1);
        assert_eq!(stats.total_downvotes, 2);
    }

    #[test]
    fn top_users_ranked_and_truncated() {
        let engine = seeded();
        engine.register_user("carol", "pw").unwrap();
        let post = engine.create_post("p", "", "carol", "science").unwrap();
        engine.vote_post(post.id, true).unwrap();
        engine.vote_post(post.id, true).unwrap();
        let post = engine.create_post("q", "", "bob", "science").unwrap();
        engine.vote_post(post.id, false).unwrap();

        let stats = engine.stats(2);
        assert_eq!(
            stats.top_users,
            vec![
                UserKarma { username: "carol".into(), karma: 2 },
                UserKarma { username: "alice".into(), karma: 0 },
            ]
        );
    }
}
