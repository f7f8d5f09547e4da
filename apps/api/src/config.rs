use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of an external match service. `None` selects the built-in dataset.
    pub match_service_url: Option<String>,
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let session_ttl_minutes = lookup("SESSION_TTL_MINUTES")
            .unwrap_or_else(|| "30".to_string())
            .parse::<i64>()
            .context("SESSION_TTL_MINUTES must be an integer")?;
        if session_ttl_minutes <= 0 {
            bail!("SESSION_TTL_MINUTES must be positive, got {session_ttl_minutes}");
        }

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            match_service_url: lookup("MATCH_SERVICE_URL").filter(|url| !url.trim().is_empty()),
            session_ttl_minutes,
        })
    }
}
