//! crates/mh_toolkit_core/src/timer.rs
//!
//! Frame schedules for the guided mindfulness timers. The schedules are pure;
//! pacing and cancellation belong to whoever plays them back.

use std::fmt;

pub const BREATHING_ROUNDS: u32 = 4;
pub const BREATHING_PHASE_SECS: u32 = 4;
pub const GROUNDING_SECS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    BoxBreathing,
    Grounding,
}

impl TimerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::BoxBreathing => "box_breathing",
            TimerKind::Grounding => "grounding",
        }
    }

    pub fn frames(&self) -> Vec<TimerFrame> {
        match self {
            TimerKind::BoxBreathing => box_breathing_frames(),
            TimerKind::Grounding => grounding_frames(),
        }
    }

    pub fn completion_message(&self) -> &'static str {
        match self {
            TimerKind::BoxBreathing => "Done. Notice how your body feels.",
            TimerKind::Grounding => "Finished. Take a slow breath.",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub const CYCLE: [BreathPhase; 3] = [BreathPhase::Inhale, BreathPhase::Hold, BreathPhase::Exhale];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Inhale",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Exhale",
        }
    }
}

/// One display update.
///
/// Announcements carry no countdown and are shown without delay; countdown
/// frames are held for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerFrame {
    pub display: String,
    pub remaining_secs: Option<u32>,
    pub phase: Option<BreathPhase>,
    pub round: Option<u32>,
}

impl TimerFrame {
    pub fn is_tick(&self) -> bool {
        self.remaining_secs.is_some()
    }
}

/// Four rounds of inhale, hold and exhale, four seconds each.
pub fn box_breathing_frames() -> Vec<TimerFrame> {
    let mut frames = Vec::new();
    for round in 1..=BREATHING_ROUNDS {
        for phase in BreathPhase::CYCLE {
            let announcement = match phase {
                BreathPhase::Inhale => format!(
                    "Round {round}/{BREATHING_ROUNDS} — Inhale for {BREATHING_PHASE_SECS}s"
                ),
                _ => format!("{} for {BREATHING_PHASE_SECS}s", phase.as_str()),
            };
            frames.push(TimerFrame {
                display: announcement,
                remaining_secs: None,
                phase: Some(phase),
                round: Some(round),
            });

            for secs in (1..=BREATHING_PHASE_SECS).rev() {
                frames.push(TimerFrame {
                    display: format!("⏱ {}: {secs}", phase.as_str()),
                    remaining_secs: Some(secs),
                    phase: Some(phase),
                    round: Some(round),
                });
            }
        }
    }
    frames
}

/// A single countdown from 120 seconds down to zero inclusive.
pub fn grounding_frames() -> Vec<TimerFrame> {
    (0..=GROUNDING_SECS)
        .rev()
        .map(|secs| TimerFrame {
            display: format!("Time remaining: {}", format_mm_ss(secs)),
            remaining_secs: Some(secs),
            phase: None,
            round: None,
        })
        .collect()
}

pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
