//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for the guided mindfulness timers.

use mh_toolkit_core::timer::{TimerFrame, TimerKind};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts four rounds of 4-4-4 box breathing, replacing any running timer.
    StartBoxBreathing,

    /// Starts the two-minute grounding countdown, replacing any running timer.
    StartGrounding,

    /// Stops the running timer early.
    Cancel,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A timer has begun; display updates follow.
    TimerStarted { timer: String },

    /// Replaces the timer display.
    Tick {
        timer: String,
        display: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining_secs: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        phase: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
    },

    /// The timer ran to completion.
    Finished { timer: String, message: String },

    /// The timer was stopped before completion.
    Cancelled { timer: String },

    /// Reports a problem with the last client message.
    Error { message: String },
}

impl ServerMessage {
    pub fn started(kind: TimerKind) -> Self {
        ServerMessage::TimerStarted {
            timer: kind.to_string(),
        }
    }

    pub fn tick(kind: TimerKind, frame: &TimerFrame) -> Self {
        ServerMessage::Tick {
            timer: kind.to_string(),
            display: frame.display.clone(),
            remaining_secs: frame.remaining_secs,
            phase: frame.phase.map(|p| p.as_str().to_string()),
            round: frame.round,
        }
    }

    pub fn finished(kind: TimerKind) -> Self {
        ServerMessage::Finished {
            timer: kind.to_string(),
            message: kind.completion_message().to_string(),
        }
    }

    pub fn cancelled(kind: TimerKind) -> Self {
        ServerMessage::Cancelled {
            timer: kind.to_string(),
        }
    }
}
