use std::env;
use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "sqlite:./fundbridge.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_RATE_LIMIT_PER_MINUTE: u64 = 120;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;

/// Per-IP request budget for the API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_minute: u64,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// `None` disables rate limiting
    pub rate_limit: Option<RateLimit>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            rate_limit: None,
        }
    }
}

impl Config {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 127.0.0.1:3000")?;

        let per_minute = match lookup("RATE_LIMIT_PER_MINUTE") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("RATE_LIMIT_PER_MINUTE must be a non-negative integer")?,
            None => DEFAULT_RATE_LIMIT_PER_MINUTE,
        };
        let burst = match lookup("RATE_LIMIT_BURST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("RATE_LIMIT_BURST must be a non-negative integer")?,
            None => DEFAULT_RATE_LIMIT_BURST,
        };

        let rate_limit = (per_minute > 0 && burst > 0).then_some(RateLimit { per_minute, burst });

        Ok(Self {
            database_url,
            bind_addr,
            rate_limit,
        })
    }
}
