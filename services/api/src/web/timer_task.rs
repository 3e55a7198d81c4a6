//! services/api/src/web/timer_task.rs
//!
//! This module contains the asynchronous "worker" function that plays back a
//! mindfulness timer, one display update per tick.

use crate::web::protocol::ServerMessage;
use mh_toolkit_core::timer::TimerKind;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Completed,
    Cancelled,
    /// The client went away before the timer ended.
    Disconnected,
}

/// Plays back the frames of `kind`.
///
/// Announcement frames are sent immediately; countdown frames are held for one
/// `tick`. The task stops as soon as `cancellation_token` fires.
pub async fn timer_process(
    kind: TimerKind,
    tick: Duration,
    sender: mpsc::Sender<ServerMessage>,
    cancellation_token: CancellationToken,
) -> TimerOutcome {
    info!("Timer {} started.", kind);

    if sender.send(ServerMessage::started(kind)).await.is_err() {
        return TimerOutcome::Disconnected;
    }

    for frame in kind.frames() {
        if cancellation_token.is_cancelled() {
            return cancelled(kind, &sender).await;
        }

        if sender.send(ServerMessage::tick(kind, &frame)).await.is_err() {
            return TimerOutcome::Disconnected;
        }

        if frame.is_tick() {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    return cancelled(kind, &sender).await;
                }
                _ = tokio::time::sleep(tick) => {}
            }
        }
    }

    info!("Timer {} finished.", kind);
    if sender.send(ServerMessage::finished(kind)).await.is_err() {
        return TimerOutcome::Disconnected;
    }
    TimerOutcome::Completed
}

async fn cancelled(kind: TimerKind, sender: &mpsc::Sender<ServerMessage>) -> TimerOutcome {
    info!("Timer {} cancelled.", kind);
    // The receiver may already be gone if cancellation came from a disconnect.
    let _ = sender.send(ServerMessage::cancelled(kind)).await;
    TimerOutcome::Cancelled
}
