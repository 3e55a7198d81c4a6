//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-connection timer state.

use crate::config::Config;
use crate::web::{protocol::ServerMessage, timer_task::timer_process};
use mh_toolkit_core::ports::{Clock, SessionRepository};
use mh_toolkit_core::timer::TimerKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionRepository>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

/// The session resolved by the session middleware for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSession(pub Uuid);

//=========================================================================================
// TimerConnection (Specific to One WebSocket Connection)
//=========================================================================================

struct ActiveTimer {
    kind: TimerKind,
    cancellation_token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Tracks the one timer a WebSocket connection may be running.
#[derive(Default)]
pub struct TimerConnection {
    active: Option<ActiveTimer>,
}

impl TimerConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `kind`, cancelling whatever timer was still running.
    pub fn start(&mut self, kind: TimerKind, tick: Duration, sender: mpsc::Sender<ServerMessage>) {
        if let Some(previous) = self.cancel_active() {
            info!("Timer {} replaced by {}.", previous, kind);
        }

        let cancellation_token = CancellationToken::new();
        let token = cancellation_token.clone();
        let handle = tokio::spawn(async move {
            let outcome = timer_process(kind, tick, sender, token).await;
            info!("Timer {} ended: {:?}", kind, outcome);
        });

        self.active = Some(ActiveTimer {
            kind,
            cancellation_token,
            handle,
        });
    }

    /// Cancels the running timer, returning its kind. Finished timers are not reported.
    pub fn cancel_active(&mut self) -> Option<TimerKind> {
        let active = self.active.take()?;
        if active.handle.is_finished() {
            return None;
        }
        active.cancellation_token.cancel();
        Some(active.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starting_a_timer_cancels_the_previous_one() {
        let (tx, mut rx) = mpsc::channel(256);
        let mut timers = TimerConnection::new();

        timers.start(TimerKind::Grounding, Duration::from_secs(60), tx.clone());
        assert_eq!(rx.recv().await, Some(ServerMessage::started(TimerKind::Grounding)));

        timers.start(TimerKind::BoxBreathing, Duration::from_secs(60), tx);
        let (mut old_cancelled, mut new_started) = (false, false);
        while !(old_cancelled && new_started) {
            match rx.recv().await {
                Some(msg) => {
                    old_cancelled |= msg == ServerMessage::cancelled(TimerKind::Grounding);
                    new_started |= msg == ServerMessage::started(TimerKind::BoxBreathing);
                }
                None => break,
            }
        }
        assert!(old_cancelled && new_started);

        assert_eq!(timers.cancel_active(), Some(TimerKind::BoxBreathing));
        assert_eq!(timers.cancel_active(), None);
    }
}
