use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::RoleMatcher;
use crate::session::page::{PageState, SubmitStart, SubmitTicket};

/// One user's page, plus bookkeeping for expiry.
#[derive(Debug)]
pub struct PageSession {
    pub id: Uuid,
    pub page: PageState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageSession {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            page: PageState::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.updated_at > ttl
    }
}

pub type SessionHandle = Arc<Mutex<PageSession>>;

/// In-memory page sessions. Each session has its own lock, so actions on one
/// session are serialized while other sessions proceed independently.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates a fresh Idle session. Expired sessions are pruned first.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let now = Utc::now();
        self.prune_expired(now).await;

        let session = PageSession::new(now);
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        debug!("Created page session {id}");
        (id, handle)
    }

    /// Locks a live session for the duration of one action.
    /// Expired sessions are dropped and reported as missing.
    pub async fn checkout(&self, id: Uuid) -> Result<OwnedMutexGuard<PageSession>, AppError> {
        let handle = self.handle(id).await?;
        self.lock_live(id, handle).await
    }

    /// Runs one submit without holding the session lock across the matcher
    /// call, so readers observe `Phase::Submitting` while it is in flight.
    /// Returns the locked session with the outcome applied.
    pub async fn submit(
        &self,
        id: Uuid,
        matcher: &dyn RoleMatcher,
    ) -> Result<OwnedMutexGuard<PageSession>, AppError> {
        let handle = self.handle(id).await?;

        let ticket = {
            let mut session = self.lock_live(id, handle.clone()).await?;
            session.touch();
            match session.page.begin_submit() {
                SubmitStart::Started(ticket) => ticket,
                SubmitStart::Rejected => return Ok(session),
                SubmitStart::InFlight => {
                    return Err(AppError::Conflict(
                        "A submit is already in progress for this session".to_string(),
                    ))
                }
            }
        };

        let pending = PendingSubmit {
            handle: handle.clone(),
            ticket: Some(ticket),
        };
        let outcome = matcher.resolve(pending.role()).await;

        let mut session = handle.lock_owned().await;
        if let Some(ticket) = pending.disarm() {
            session.page.finish_submit(&ticket, outcome);
        }
        session.touch();
        debug!(backend = matcher.backend(), "Submit applied to session {id}");
        Ok(session)
    }

    async fn handle(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn lock_live(
        &self,
        id: Uuid,
        handle: SessionHandle,
    ) -> Result<OwnedMutexGuard<PageSession>, AppError> {
        let session = handle.lock_owned().await;
        if session.is_expired(Utc::now(), self.ttl) {
            drop(session);
            self.sessions.write().await.remove(&id);
            return Err(not_found(id));
        }
        Ok(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Drops sessions idle longer than the TTL. Sessions locked by an
    /// in-flight action are kept. Returns the number removed.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_expired(now, self.ttl),
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Pruned {removed} expired page sessions");
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Owns the in-flight ticket of a submit. Dropping it before `disarm`
/// (the request future was cancelled) clears the session's flag.
struct PendingSubmit {
    handle: SessionHandle,
    ticket: Option<SubmitTicket>,
}

impl PendingSubmit {
    fn role(&self) -> &str {
        self.ticket.as_ref().map(|t| t.role.as_str()).unwrap_or_default()
    }

    fn disarm(mut self) -> Option<SubmitTicket> {
        self.ticket.take()
    }
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        warn!(role = %ticket.role, "Submit dropped before completion");
        match self.handle.try_lock() {
            Ok(mut session) => session.page.abort_submit(&ticket),
            Err(_) => {
                let handle = self.handle.clone();
                tokio::spawn(async move {
                    handle.lock().await.page.abort_submit(&ticket);
                });
            }
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::matching::testing::{FailingMatcher, GatedMatcher};
    use crate::matching::StaticRoleMatcher;
    use crate::session::page::{Phase, EMPTY_ROLE_MESSAGE};

    async fn wait_for_phase(store: &SessionStore, id: Uuid, phase: Phase) {
        for _ in 0..200 {
            if store.checkout(id).await.unwrap().page.phase() == phase {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("session never reached {phase:?}");
    }

    #[tokio::test]
    async fn test_create_then_checkout() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;

        let mut session = store.checkout(id).await.unwrap();
        session.page.edit_query("Actuary");
        drop(session);

        let session = store.checkout(id).await.unwrap();
        assert_eq!(session.page.query, "Actuary");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::new(Duration::minutes(30));
        let err = store.checkout(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;

        store.remove(id).await.unwrap();
        assert!(store.checkout(id).await.is_err());
        assert!(store.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn test_prune_drops_idle_sessions_only() {
        let store = SessionStore::new(Duration::minutes(30));
        let (_, stale) = store.create().await;
        let (fresh_id, _) = store.create().await;
        stale.lock().await.updated_at = Utc::now() - Duration::minutes(45);

        assert_eq!(store.prune_expired(Utc::now()).await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.checkout(fresh_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_session_is_not_found_on_checkout() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, handle) = store.create().await;
        handle.lock().await.updated_at = Utc::now() - Duration::minutes(31);

        assert!(store.checkout(id).await.is_err());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_prune_keeps_locked_sessions() {
        let store = SessionStore::new(Duration::minutes(1));
        let (_, handle) = store.create().await;
        let mut held = handle.lock().await;
        held.updated_at = Utc::now() - Duration::minutes(10);

        assert_eq!(store.prune_expired(Utc::now()).await, 0);
        drop(held);
        assert_eq!(store.prune_expired(Utc::now()).await, 1);
    }

    #[tokio::test]
    async fn test_submit_applies_matches() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;
        store.checkout(id).await.unwrap().page.edit_query("actuary");

        let session = store.submit(id, &StaticRoleMatcher).await.unwrap();
        assert_eq!(session.page.phase(), Phase::Success);
        assert_eq!(session.page.results.as_ref().unwrap().len(), 3);
        assert!(!session.page.submitting);
    }

    #[tokio::test]
    async fn test_submit_with_empty_query_is_rejected_in_view() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;

        let session = store.submit(id, &StaticRoleMatcher).await.unwrap();
        assert_eq!(session.page.phase(), Phase::Error);
        assert_eq!(session.page.error.as_deref(), Some(EMPTY_ROLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_submit_failure_is_reported_in_view() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;
        store.checkout(id).await.unwrap().page.edit_query("Actuary");

        let matcher = FailingMatcher("backend exploded".to_string());
        let session = store.submit(id, &matcher).await.unwrap();
        assert_eq!(session.page.phase(), Phase::Error);
        assert_eq!(session.page.error.as_deref(), Some("backend exploded"));
    }

    #[tokio::test]
    async fn test_session_readable_while_submit_in_flight() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;
        store.checkout(id).await.unwrap().page.choose_suggestion("Accountant");

        let matcher = Arc::new(GatedMatcher::default());
        let task = {
            let store = store.clone();
            let matcher = matcher.clone();
            tokio::spawn(async move {
                let session = store.submit(id, matcher.as_ref()).await.unwrap();
                session.page.phase()
            })
        };

        wait_for_phase(&store, id, Phase::Submitting).await;
        assert!(store.checkout(id).await.unwrap().page.submitting);

        let second = store.submit(id, &StaticRoleMatcher).await.unwrap_err();
        assert!(matches!(second, AppError::Conflict(_)));

        matcher.release();
        assert_eq!(task.await.unwrap(), Phase::Success);
        let session = store.checkout(id).await.unwrap();
        assert_eq!(session.page.results.as_ref().unwrap()[0].score, 80);
    }

    #[tokio::test]
    async fn test_cancelled_submit_clears_submitting() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;
        store.checkout(id).await.unwrap().page.edit_query("Actuary");

        let matcher = GatedMatcher::default();
        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            store.submit(id, &matcher),
        )
        .await;
        assert!(timed_out.is_err());

        let session = store.checkout(id).await.unwrap();
        assert!(!session.page.submitting);
        assert_eq!(session.page.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_edit_during_submit_discards_outcome() {
        let store = SessionStore::new(Duration::minutes(30));
        let (id, _) = store.create().await;
        store.checkout(id).await.unwrap().page.edit_query("Actuary");

        let matcher = Arc::new(GatedMatcher::default());
        let task = {
            let store = store.clone();
            let matcher = matcher.clone();
            tokio::spawn(async move { store.submit(id, matcher.as_ref()).await.unwrap().page.phase() })
        };

        wait_for_phase(&store, id, Phase::Submitting).await;
        store.checkout(id).await.unwrap().page.edit_query("Acc");

        matcher.release();
        assert_eq!(task.await.unwrap(), Phase::Idle);
        assert!(store.checkout(id).await.unwrap().page.results.is_none());
    }
}
