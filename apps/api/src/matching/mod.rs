//! Role matching — pluggable, trait-based lookup of suggestions and match records.
//!
//! Default: `StaticRoleMatcher` over the built-in demo dataset.
//! `RemoteRoleMatcher` forwards resolves to an external match service.
//!
//! `AppState` holds an `Arc<dyn RoleMatcher>`, chosen at startup via config.

pub mod catalog;
pub mod handlers;
pub mod remote;
pub mod resolver;
pub mod suggest;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::role::MatchRecord;

/// The matcher trait. Implement this to swap backends without touching
/// the session state machine or the handlers.
#[async_trait]
pub trait RoleMatcher: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, AppError>;

    async fn resolve(&self, role: &str) -> Result<Vec<MatchRecord>, AppError>;

    /// Label surfaced in logs, e.g. "static" | "remote".
    fn backend(&self) -> &'static str;
}

/// Dataset-backed matcher. Never fails.
pub struct StaticRoleMatcher;

#[async_trait]
impl RoleMatcher for StaticRoleMatcher {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, AppError> {
        Ok(suggest::suggest(query))
    }

    async fn resolve(&self, role: &str) -> Result<Vec<MatchRecord>, AppError> {
        Ok(resolver::resolve(role))
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_matcher_delegates() {
        let matcher = StaticRoleMatcher;
        assert_eq!(matcher.suggest("").await.unwrap().len(), 7);
        assert_eq!(matcher.resolve("actuary").await.unwrap().len(), 3);
        assert!(matcher.resolve("Consultant").await.unwrap().is_empty());
        assert_eq!(matcher.backend(), "static");
    }
}
