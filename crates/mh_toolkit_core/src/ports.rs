//! crates/mh_toolkit_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the toolkit's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of how sessions are stored or how time is read.

use crate::domain::Session;
use crate::store::SessionStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Owns every live session and its store. Each session is isolated from the others.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates an empty session.
    async fn create_session(&self, now: DateTime<Utc>) -> PortResult<Session>;

    /// Refreshes the last-access time. Fails with `NotFound` if the session is
    /// unknown or has been idle past its time-to-live.
    async fn touch_session(&self, session_id: Uuid, now: DateTime<Utc>) -> PortResult<Session>;

    async fn load_store(&self, session_id: Uuid) -> PortResult<SessionStore>;

    async fn save_store(&self, session_id: Uuid, store: SessionStore) -> PortResult<()>;

    async fn delete_session(&self, session_id: Uuid) -> PortResult<()>;

    /// Discards idle sessions, returning how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> PortResult<usize>;
}

/// Source of the current time, used to stamp records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
