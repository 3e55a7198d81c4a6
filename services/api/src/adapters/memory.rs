//! services/api/src/adapters/memory.rs
//!
//! This module contains the session adapter, the concrete implementation of the
//! `SessionRepository` port from the `core` crate. Sessions live only in process
//! memory and are discarded once idle past their time-to-live.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mh_toolkit_core::domain::Session;
use mh_toolkit_core::ports::{PortError, PortResult, SessionRepository};
use mh_toolkit_core::store::SessionStore;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// Session Entries
//=========================================================================================

struct SessionEntry {
    session: Session,
    store: SessionStore,
}

impl SessionEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A negative idle time (clock moved backwards) never expires a session.
        (now - self.session.last_accessed_at)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory adapter that implements the `SessionRepository` port.
pub struct InMemorySessionAdapter {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl InMemorySessionAdapter {
    /// Creates a new `InMemorySessionAdapter` whose sessions expire after `ttl` of inactivity.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn not_found(session_id: Uuid) -> PortError {
    PortError::NotFound(format!("session {}", session_id))
}

//=========================================================================================
// `SessionRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionRepository for InMemorySessionAdapter {
    async fn create_session(&self, now: DateTime<Utc>) -> PortResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            created_at: now,
            last_accessed_at: now,
        };
        self.sessions.lock().await.insert(
            session.id,
            SessionEntry {
                session: session.clone(),
                store: SessionStore::new(),
            },
        );
        Ok(session)
    }

    async fn touch_session(&self, session_id: Uuid, now: DateTime<Utc>) -> PortResult<Session> {
        let mut sessions = self.sessions.lock().await;
        let expired = match sessions.get(&session_id) {
            Some(entry) => entry.is_expired(now, self.ttl),
            None => return Err(not_found(session_id)),
        };
        if expired {
            sessions.remove(&session_id);
            info!("Session {} expired on access.", session_id);
            return Err(not_found(session_id));
        }

        let entry = sessions
            .get_mut(&session_id)
            .ok_or_else(|| not_found(session_id))?;
        entry.session.last_accessed_at = now;
        Ok(entry.session.clone())
    }

    async fn load_store(&self, session_id: Uuid) -> PortResult<SessionStore> {
        self.sessions
            .lock()
            .await
            .get(&session_id)
            .map(|entry| entry.store.clone())
            .ok_or_else(|| not_found(session_id))
    }

    async fn save_store(&self, session_id: Uuid, store: SessionStore) -> PortResult<()> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or_else(|| not_found(session_id))?;
        entry.store = store;
        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> PortResult<()> {
        self.sessions
            .lock()
            .await
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| not_found(session_id))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> PortResult<usize> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, self.ttl));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mh_toolkit_core::domain::{Importance, SafetyPlan};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn adapter() -> InMemorySessionAdapter {
        InMemorySessionAdapter::new(Duration::from_secs(30 * 60))
    }

    #[tokio::test]
    async fn new_session_starts_with_empty_store() {
        let repo = adapter();
        let session = repo.create_session(t0()).await.unwrap();
        let store = repo.load_store(session.id).await.unwrap();
        assert!(store.thought_records().is_empty());
        assert!(store.activities().is_empty());
        assert_eq!(store.safety_plan(), &SafetyPlan::default());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let repo = adapter();
        let a = repo.create_session(t0()).await.unwrap();
        let b = repo.create_session(t0()).await.unwrap();

        let mut store = repo.load_store(a.id).await.unwrap();
        store.add_activity("walk", Importance::Low, t0());
        repo.save_store(a.id, store).await.unwrap();

        assert_eq!(repo.load_store(a.id).await.unwrap().activities().len(), 1);
        assert!(repo.load_store(b.id).await.unwrap().activities().is_empty());
    }

    #[tokio::test]
    async fn touch_refreshes_last_access() {
        let repo = adapter();
        let session = repo.create_session(t0()).await.unwrap();
        let later = t0() + chrono::Duration::minutes(20);

        let touched = repo.touch_session(session.id, later).await.unwrap();
        assert_eq!(touched.last_accessed_at, later);
        assert_eq!(touched.created_at, t0());

        // Still alive 20 minutes after the refreshed access.
        let again = later + chrono::Duration::minutes(20);
        assert!(repo.touch_session(session.id, again).await.is_ok());
    }

    #[tokio::test]
    async fn idle_session_expires_on_touch() {
        let repo = adapter();
        let session = repo.create_session(t0()).await.unwrap();
        let late = t0() + chrono::Duration::minutes(31);

        let err = repo.touch_session(session.id, late).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn purge_removes_only_idle_sessions() {
        let repo = adapter();
        let stale = repo.create_session(t0()).await.unwrap();
        let fresh = repo
            .create_session(t0() + chrono::Duration::minutes(25))
            .await
            .unwrap();

        let removed = repo
            .purge_expired(t0() + chrono::Duration::minutes(40))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(repo.load_store(stale.id).await.is_err());
        assert!(repo.load_store(fresh.id).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_unknown_session_is_not_found() {
        let repo = adapter();
        let err = repo.delete_session(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}
