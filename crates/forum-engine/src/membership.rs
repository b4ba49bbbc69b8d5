use tracing::debug;
use uuid::Uuid;

use forum_types::models::Post;

use crate::{Engine, EntityKind, Result, karma_delta, vote_delta, write};

impl Engine {
    /// Adds the user to the subreddit's members and the subreddit to the
    /// user's joined set. Joining twice is a no-op.
    pub fn join_subreddit(&self, username: &str, subreddit: &str) -> Result<()> {
        let user = self.user_record(username, EntityKind::User)?;
        let community = self.subreddit_record(subreddit)?;

        // Rank order: subreddit before user.
        let mut community = write(&community);
        let mut user = write(&user);
        community.members.insert(username.to_string());
        user.subreddits.insert(subreddit.to_string());

        debug!(username = %username, subreddit = %subreddit, "joined subreddit");
        Ok(())
    }

    /// Inverse of [`Engine::join_subreddit`]. Leaving a subreddit the user
    /// never joined is a no-op, but both entities must exist.
    pub fn leave_subreddit(&self, username: &str, subreddit: &str) -> Result<()> {
        let user = self.user_record(username, EntityKind::User)?;
        let community = self.subreddit_record(subreddit)?;

        let mut community = write(&community);
        let mut user = write(&user);
        community.members.remove(username);
        user.subreddits.remove(subreddit);

        debug!(username = %username, subreddit = %subreddit, "left subreddit");
        Ok(())
    }

    /// Upvote: post +2, author karma +1. Downvote: post -1, author karma -1.
    ///
    /// The post counter and the author's karma are updated one after the
    /// other, so a concurrent reader can briefly see one without the other.
    /// Authors that never registered keep no karma.
    pub fn vote_post(&self, post_id: Uuid, upvote: bool) -> Result<Post> {
        let post = self.post_record(post_id)?;

        let (snapshot, author) = {
            let mut post = write(&post);
            post.votes += vote_delta(upvote);
            (post.snapshot(), post.author.clone())
        };

        match self.user_record(&author, EntityKind::User) {
            Ok(user) => {
                write(&user).karma += karma_delta(upvote);
            }
            Err(_) => debug!(author = %author, "vote on post by unregistered author, karma skipped"),
        }

        debug!(post_id = %post_id, upvote, votes = snapshot.votes, "voted on post");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;
    use crate::test_support::seeded;

    #[test]
    fn join_is_idempotent_and_updates_both_sides() {
        let engine = seeded();
        engine.join_subreddit("bob", "science").unwrap();
        engine.join_subreddit("bob", "science").unwrap();

        assert_eq!(engine.get_user("bob").unwrap().subreddits, ["science"]);
        assert_eq!(engine.get_subreddit("science").unwrap().members, ["bob"]);
    }

    #[test]
    fn leave_removes_both_sides_and_tolerates_absent_entries() {
        let engine = seeded();
        engine.join_subreddit("bob", "science").unwrap();
        engine.leave_subreddit("bob", "science").unwrap();
        engine.leave_subreddit("bob", "science").unwrap();

        assert!(engine.get_user("bob").unwrap().subreddits.is_empty());
        assert!(engine.get_subreddit("science").unwrap().members.is_empty());
    }

    #[test]
    fn membership_requires_both_entities() {
        let engine = seeded();
        assert_eq!(
            engine.join_subreddit("ghost", "science").unwrap_err(),
            EngineError::not_found(EntityKind::User, "ghost")
        );
        assert_eq!(
            engine.join_subreddit("bob", "nowhere").unwrap_err(),
            EngineError::not_found(EntityKind::Subreddit, "nowhere")
        );
        assert_eq!(
            engine.leave_subreddit("bob", "nowhere").unwrap_err().kind(),
            Some(EntityKind::Subreddit)
        );
    }

    #[test]
    fn votes_follow_asymmetric_policy() {
        let engine = seeded();
        let post = engine.create_post("H", "C", "alice", "science").unwrap();

        for _ in 0..3 {
            engine.vote_post(post.id, true).unwrap();
        }
        for _ in 0..5 {
            engine.vote_post(post.id, false).unwrap();
        }

        assert_eq!(engine.get_post(post.id).unwrap().votes, 2 * 3 - 5);
        assert_eq!(engine.get_user("alice").unwrap().karma, 3 - 5);
    }

    #[test]
    fn vote_on_missing_post_fails() {
        let engine = seeded();
        assert_eq!(
            engine.vote_post(Uuid::new_v4(), true).unwrap_err().kind(),
            Some(EntityKind::Post)
        );
    }

    #[test]
    fn unregistered_author_still_collects_post_votes() {
        let engine = seeded();
        let post = engine.create_post("H", "C", "nobody", "science").unwrap();
        let voted = engine.vote_post(post.id, true).unwrap();
        assert_eq!(voted.votes, 2);
    }

    #[test]
    fn science_scenario() {
        let engine = seeded();
        engine.join_subreddit("bob", "science").unwrap();
        let post = engine.create_post("H", "C", "alice", "science").unwrap();
        engine.vote_post(post.id, true).unwrap();

        assert_eq!(engine.get_post(post.id).unwrap().votes, 2);
        assert_eq!(engine.get_user("alice").unwrap().karma, 1);

        let feed = engine.get_user_feed("bob").unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "H");
    }
}
