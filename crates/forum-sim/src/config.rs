use anyhow::Context;

/// Where the simulated users send their requests.
#[derive(Debug, Clone, PartialEq)]
pub enum SimTarget {
    /// An engine actor started inside the simulator process.
    Actor,
    /// A running forum server, e.g. `http://127.0.0.1:8080`.
    Http(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub users: usize,
    pub subreddits: usize,
    pub zipf_alpha: f64,
    /// Fixed seed for a reproducible run. Random when absent.
    pub seed: Option<u64>,
    pub target: SimTarget,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            users: 50,
            subreddits: 20,
            zipf_alpha: 1.3,
            seed: None,
            target: SimTarget::Actor,
        }
    }
}

impl SimConfig {
    /// Reads `FORUM_SIM_*` variables, falling back to the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let users = match lookup("FORUM_SIM_USERS") {
            Some(v) => v.parse().context("FORUM_SIM_USERS must be a number")?,
            None => defaults.users,
        };
        let subreddits = match lookup("FORUM_SIM_SUBREDDITS") {
            Some(v) => v.parse().context("FORUM_SIM_SUBREDDITS must be a number")?,
            None => defaults.subreddits,
        };
        let zipf_alpha = match lookup("FORUM_SIM_ZIPF_ALPHA") {
            Some(v) => v.parse().context("FORUM_SIM_ZIPF_ALPHA must be a number")?,
            None => defaults.zipf_alpha,
        };
        let seed = lookup("FORUM_SIM_SEED")
            .map(|v| v.parse().context("FORUM_SIM_SEED must be an unsigned integer"))
            .transpose()?;
        let target = match lookup("FORUM_SIM_TARGET").as_deref().map(str::trim) {
            None | Some("") | Some("actor") => SimTarget::Actor,
            Some(url) => SimTarget::Http(url.trim_end_matches('/').to_string()),
        };

        anyhow::ensure!(users > 0, "FORUM_SIM_USERS must be at least 1");
        anyhow::ensure!(subreddits > 0, "FORUM_SIM_SUBREDDITS must be at least 1");

        Ok(Self {
            users,
            subreddits,
            zipf_alpha,
            seed,
            target,
        })
    }
}
