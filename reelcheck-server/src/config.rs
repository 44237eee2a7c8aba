use anyhow::{Context, Result};
use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Secret for signing session tokens (HS256).
    pub session_secret: String,
    /// Session token lifetime in seconds.
    pub session_ttl_secs: u64,
    /// If true, seed the store with the demo dataset at startup.
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let session_secret =
            env::var("SESSION_SECRET").context("SESSION_SECRET environment variable is required")?;
        if session_secret.trim().is_empty() {
            anyhow::bail!("SESSION_SECRET must not be empty");
        }

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .context("SESSION_TTL_SECS must be a valid number")?;

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        Ok(Config {
            port,
            session_secret,
            session_ttl_secs,
            seed_demo_data,
        })
    }
}
