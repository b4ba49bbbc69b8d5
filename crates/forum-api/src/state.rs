use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use forum_engine::Engine;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub engine: Arc<Engine>,
    /// How many users `GET /api/stats` ranks.
    pub stats_top_n: usize,
    user_counter: AtomicU64,
}

impl AppStateInner {
    pub fn new(engine: Arc<Engine>, stats_top_n: usize) -> AppState {
        Arc::new(Self {
            engine,
            stats_top_n,
            user_counter: AtomicU64::new(0),
        })
    }

    /// Name for a registration that did not pick one: `user1`, `user2`, ...
    pub fn next_generated_username(&self) -> String {
        let n = self.user_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("user{n}")
    }
}
