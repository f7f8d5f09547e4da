use std::sync::Arc;

use crate::config::Config;
use crate::matching::RoleMatcher;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable matcher. Default: StaticRoleMatcher. Swap via MATCH_SERVICE_URL.
    pub matcher: Arc<dyn RoleMatcher>,
    pub sessions: SessionStore,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests() -> Self {
        Self::for_tests_with(Arc::new(crate::matching::StaticRoleMatcher))
    }

    pub fn for_tests_with(matcher: Arc<dyn RoleMatcher>) -> Self {
        let config = Config::from_lookup(|_| None).expect("default config");
        let sessions =
            SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes));
        Self {
            config,
            matcher,
            sessions,
        }
    }
}
