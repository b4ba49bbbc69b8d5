use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Users ranked by `GET /api/stats`.
    pub stats_top_n: usize,
    /// When set, the server drives this many simulated users against itself.
    pub simulate_users: Option<usize>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("FORUM_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = lookup("FORUM_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("FORUM_PORT must be a port number")?;
        let stats_top_n = lookup("FORUM_STATS_TOP_N")
            .unwrap_or_else(|| "5".into())
            .parse()
            .context("FORUM_STATS_TOP_N must be a number")?;
        let simulate_users = lookup("FORUM_SIMULATE_USERS")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().parse().context("FORUM_SIMULATE_USERS must be a number"))
            .transpose()?;

        Ok(Self {
            host,
            port,
            stats_top_n,
            simulate_users,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
