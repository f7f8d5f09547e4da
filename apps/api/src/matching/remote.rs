//! HTTP-backed matcher for an external match service.
//!
//! Wire contract: `POST {base}/api/match` with `{ "role": ... }`, answered by
//! `{ "results": [MatchRecord] }`. Suggestions stay local; the catalog is fixed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::matching::{suggest, RoleMatcher};
use crate::models::role::{MatchRecord, ScoreOutOfRange};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum RemoteMatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid match record: {0}")]
    InvalidRecord(#[from] ScoreOutOfRange),
}

impl RemoteMatchError {
    /// Transport failures and 5xx are worth another attempt; a malformed or
    /// rejected answer is not.
    fn is_retryable(&self) -> bool {
        match self {
            RemoteMatchError::Http(e) => !e.is_decode(),
            RemoteMatchError::Api { status, .. } => *status >= 500,
            RemoteMatchError::InvalidRecord(_) => false,
        }
    }
}

impl From<RemoteMatchError> for AppError {
    fn from(e: RemoteMatchError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct MatchResponse {
    results: Vec<MatchRecord>,
}

#[derive(Clone)]
pub struct RemoteRoleMatcher {
    client: Client,
    endpoint: String,
}

impl RemoteRoleMatcher {
    pub fn new(base_url: &str) -> Result<Self, RemoteMatchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: match_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the role to the match service.
    /// Retries transport errors and 5xx responses with exponential backoff.
    pub async fn fetch(&self, role: &str) -> Result<Vec<MatchRecord>, RemoteMatchError> {
        let body = MatchRequest { role };
        let mut attempt = 1;

        loop {
            match self.send_once(&body).await {
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    // 250ms, 500ms
                    let delay = Duration::from_millis(BASE_BACKOFF_MS << (attempt - 1));
                    warn!(
                        "Match service attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
                Ok(records) => {
                    debug!(
                        "Match service resolved '{}' to {} records after {} attempt(s)",
                        role,
                        records.len(),
                        attempt
                    );
                    return Ok(records);
                }
            }
        }
    }

    async fn send_once(&self, body: &MatchRequest<'_>) -> Result<Vec<MatchRecord>, RemoteMatchError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                warn!("Match service returned {}: {}", status, message);
            }
            return Err(RemoteMatchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MatchResponse = response.json().await?;
        for record in &parsed.results {
            record.validate()?;
        }
        Ok(parsed.results)
    }
}

#[async_trait]
impl RoleMatcher for RemoteRoleMatcher {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, AppError> {
        Ok(suggest::suggest(query))
    }

    async fn resolve(&self, role: &str) -> Result<Vec<MatchRecord>, AppError> {
        Ok(self.fetch(role).await?)
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

fn match_endpoint(base_url: &str) -> String {
    format!("{}/api/match", base_url.trim_end_matches('/'))
}
