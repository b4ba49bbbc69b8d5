//! Simulation runner: one tokio task per simulated user.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use forum_types::models::StatsSnapshot;

use crate::ForumClient;
use crate::config::SimConfig;
use crate::zipf;

/// Account that owns every simulated community.
pub const ADMIN: &str = "admin";

const UPVOTE_CHANCE: f64 = 0.7;
const THREAD_REPLY_CHANCE: f64 = 0.25;
const DM_REPLY_CHANCE: f64 = 0.3;

/// Successful actions per kind, shared by all user tasks.
#[derive(Default)]
struct SimCounters {
    registered: AtomicU64,
    subreddits: AtomicU64,
    joins: AtomicU64,
    leaves: AtomicU64,
    posts: AtomicU64,
    votes: AtomicU64,
    comments: AtomicU64,
    messages: AtomicU64,
    replies: AtomicU64,
    failures: AtomicU64,
}

impl SimCounters {
    /// Counts the outcome of one action and hands back its value on success.
    fn record<T>(&self, counter: &AtomicU64, action: &'static str, result: anyhow::Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                counter.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                debug!(action, error = %e, "simulated action failed");
                None
            }
        }
    }

    fn report(&self, elapsed: Duration, stats: StatsSnapshot) -> SimReport {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        SimReport {
            elapsed,
            registered: load(&self.registered),
            subreddits: load(&self.subreddits),
            joins: load(&self.joins),
            leaves: load(&self.leaves),
            posts: load(&self.posts),
            votes: load(&self.votes),
            comments: load(&self.comments),
            messages: load(&self.messages),
            replies: load(&self.replies),
            failures: load(&self.failures),
            stats,
        }
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub elapsed: Duration,
    /// Accounts registered, the admin included.
    pub registered: u64,
    pub subreddits: u64,
    pub joins: u64,
    pub leaves: u64,
    pub posts: u64,
    pub votes: u64,
    pub comments: u64,
    pub messages: u64,
    pub replies: u64,
    /// Actions the forum rejected or that never got an answer.
    pub failures: u64,
    /// Forum-wide stats fetched after the last user finished.
    pub stats: StatsSnapshot,
}

impl SimReport {
    pub fn log(&self) {
        info!(
            elapsed_ms = self.elapsed.as_millis() as u64,
            registered = self.registered,
            subreddits = self.subreddits,
            joins = self.joins,
            leaves = self.leaves,
            posts = self.posts,
            votes = self.votes,
            comments = self.comments,
            messages = self.messages,
            replies = self.replies,
            failures = self.failures,
            "simulation finished"
        );
        info!(
            users = self.stats.total_users,
            subreddits = self.stats.total_subreddits,
            posts = self.stats.total_posts,
            comments = self.stats.total_comments,
            direct_messages = self.stats.total_direct_messages,
            upvotes = self.stats.total_upvotes,
            downvotes = self.stats.total_downvotes,
            "forum stats"
        );
        for (rank, user) in self.stats.top_users.iter().enumerate() {
            info!(rank = rank + 1, username = %user.username, karma = user.karma, "top user");
        }
    }
}

pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn username(index: usize) -> String {
        format!("user_{index}")
    }

    pub fn subreddit_name(index: usize) -> String {
        format!("r_{index}")
    }

    /// Seeds the communities, runs every simulated user to completion and
    /// reports. Only the closing stats request can fail the run.
    pub async fn run<C>(&self, client: Arc<C>) -> anyhow::Result<SimReport>
    where
        C: ForumClient + 'static,
    {
        let start = Instant::now();
        let counters = Arc::new(SimCounters::default());
        let mut seeds = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        counters.record(&counters.registered, "register", client.register(ADMIN).await);
        for index in 0..self.config.subreddits {
            let name = Self::subreddit_name(index);
            let description = format!("A community for {name}");
            let created = client.create_subreddit(ADMIN, &name, &description).await;
            counters.record(&counters.subreddits, "create_subreddit", created);
        }
        info!(
            users = self.config.users,
            subreddits = self.config.subreddits,
            zipf_alpha = self.config.zipf_alpha,
            "simulation started"
        );

        let mut tasks = JoinSet::new();
        for index in 0..self.config.users {
            let user = SimUser {
                index,
                config: self.config.clone(),
                client: Arc::clone(&client),
                counters: Arc::clone(&counters),
                rng: StdRng::seed_from_u64(seeds.random()),
            };
            tasks.spawn(user.run());
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "simulated user task failed");
                counters.failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        let stats = client.stats().await?;
        Ok(counters.report(start.elapsed(), stats))
    }
}

struct SimUser<C> {
    index: usize,
    config: SimConfig,
    client: Arc<C>,
    counters: Arc<SimCounters>,
    rng: StdRng,
}

impl<C: ForumClient> SimUser<C> {
    async fn run(mut self) {
        let me = Simulator::username(self.index);
        let registered = self.client.register(&me).await;
        if self.counters.record(&self.counters.registered, "register", registered).is_none() {
            return;
        }

        let communities: Vec<String> = (0..self.config.subreddits).map(Simulator::subreddit_name).collect();
        let joined = self.join_and_leave(&me, &communities).await;

        let activity = zipf::activity(self.config.users, self.index + 1, self.config.zipf_alpha);
        let post_count = zipf::posts_for(activity, self.config.users);
        for n in 0..post_count {
            let pool = if joined.is_empty() { &communities } else { &joined };
            let Some(subreddit) = pool.choose(&mut self.rng).cloned() else {
                break;
            };
            let title = format!("Post {n} by {me}");
            let content = format!("Simulated content from {me} in {subreddit}");
            let created = self.client.create_post(&me, &subreddit, &title, &content).await;
            if let Some(post_id) = self.counters.record(&self.counters.posts, "create_post", created) {
                self.vote_on(&me, post_id).await;
                self.comment_on(&me, post_id).await;
            }
        }

        self.exchange_messages(&me).await;
        debug!(user = %me, activity, posts = post_count, "simulated user finished");
    }

    /// Joins two to four communities, then leaves up to two of them.
    /// Returns the communities still joined.
    async fn join_and_leave(&mut self, me: &str, communities: &[String]) -> Vec<String> {
        let want = self.rng.random_range(2..=4_usize).min(communities.len());
        let picks: Vec<String> = communities.choose_multiple(&mut self.rng, want).cloned().collect();

        let mut joined = Vec::with_capacity(picks.len());
        for subreddit in picks {
            let result = self.client.join(me, &subreddit).await;
            if self.counters.record(&self.counters.joins, "join", result).is_some() {
                joined.push(subreddit);
            }
        }

        let leaving = self.rng.random_range(0..=2_usize).min(joined.len());
        let mut kept = Vec::with_capacity(joined.len());
        for (i, subreddit) in joined.into_iter().enumerate() {
            if i < leaving {
                let result = self.client.leave(me, &subreddit).await;
                if self.counters.record(&self.counters.leaves, "leave", result).is_some() {
                    continue;
                }
            }
            kept.push(subreddit);
        }
        kept
    }

    async fn vote_on(&mut self, me: &str, post_id: Uuid) {
        for _ in 0..self.rng.random_range(5..=14) {
            let upvote = self.rng.random_bool(UPVOTE_CHANCE);
            let result = self.client.vote_post(me, post_id, upvote).await;
            self.counters.record(&self.counters.votes, "vote_post", result);
        }
    }

    /// Each comment either starts a new thread or answers the one before it.
    async fn comment_on(&mut self, me: &str, post_id: Uuid) {
        let mut previous: Option<Uuid> = None;
        for k in 0..self.rng.random_range(2..=6) {
            let parent_id = previous.filter(|_| self.rng.random_bool(THREAD_REPLY_CHANCE));
            let content = format!("Comment {k} by {me}");
            let result = self.client.add_comment(me, post_id, parent_id, &content).await;
            if let Some(id) = self.counters.record(&self.counters.comments, "add_comment", result) {
                previous = Some(id);
            }
        }
    }

    /// Sends up to two messages to other simulated users; some recipients
    /// answer.
    async fn exchange_messages(&mut self, me: &str) {
        let users = self.config.users;
        if users < 2 {
            return;
        }
        for _ in 0..self.rng.random_range(0..=2) {
            let mut other = self.rng.random_range(0..users - 1);
            if other >= self.index {
                other += 1;
            }
            let recipient = Simulator::username(other);

            let sent = self.client.send_dm(me, &recipient, &format!("Hello from {me}")).await;
            let Some(message_id) = self.counters.record(&self.counters.messages, "send_dm", sent) else {
                continue;
            };
            if self.rng.random_bool(DM_REPLY_CHANCE) {
                let reply = format!("Reply from {recipient}");
                let result = self.client.reply_dm(&recipient, message_id, &reply).await;
                self.counters.record(&self.counters.replies, "reply_dm", result);
            }
        }
    }
}
