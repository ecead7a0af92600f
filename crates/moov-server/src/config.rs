use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Session secrets that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "supersecretkey",
];

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub venues_csv: PathBuf,
    /// `None` means a random per-process secret.
    pub session_secret: Option<String>,
    pub session_ttl_hours: i64,
    pub seed_demo_users: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("MOOV_HOST", "0.0.0.0");
        let port: u16 = var("MOOV_PORT", "5000")
            .parse()
            .context("MOOV_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("MOOV_HOST must be an IP address")?;

        let session_secret = lookup("MOOV_SESSION_SECRET").filter(|s| !s.is_empty());
        if let Some(secret) = &session_secret {
            if PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
                bail!("MOOV_SESSION_SECRET is still a placeholder value");
            }
        }

        let session_ttl_hours: i64 = var("MOOV_SESSION_TTL_HOURS", "24")
            .parse()
            .context("MOOV_SESSION_TTL_HOURS must be a whole number")?;
        if session_ttl_hours < 1 {
            bail!("MOOV_SESSION_TTL_HOURS must be at least 1");
        }

        let seed_demo_users = matches!(
            var("MOOV_SEED_DEMO_USERS", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        Ok(Self {
            addr,
            db_path: var("MOOV_DB_PATH", "moov.db").into(),
            venues_csv: var("MOOV_VENUES_CSV", "venues_in_atlanta_extended.csv").into(),
            session_secret,
            session_ttl_hours,
            seed_demo_users,
        })
    }
}
