//! crates/mh_toolkit_core/src/domain.rs
//!
//! Defines the pure, core data structures for the toolkit.
//! These structs are independent of any web framework or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Returned when a label does not name one of a fixed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// One user's isolated interaction context.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

//=========================================================================================
// Thought Records
//=========================================================================================

/// The primary emotion attached to a thought record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emotion {
    #[default]
    Anxiety,
    Sadness,
    Anger,
    Guilt,
    Shame,
    Other,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Anxiety,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Guilt,
        Emotion::Shame,
        Emotion::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anxiety => "Anxiety",
            Emotion::Sadness => "Sadness",
            Emotion::Anger => "Anger",
            Emotion::Guilt => "Guilt",
            Emotion::Shame => "Shame",
            Emotion::Other => "Other",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel {
                kind: "emotion",
                value: s.to_string(),
            })
    }
}

/// Emotional intensity on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Intensity(u8);

impl Intensity {
    pub const MAX: u8 = 100;

    /// Builds an intensity, clamping the raw value into `0..=100`.
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(50)
    }
}

/// The user-entered fields of a thought record, before it is stamped.
#[derive(Debug, Clone, Default)]
pub struct ThoughtRecordDraft {
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub evidence_for: String,
    pub evidence_against: String,
    pub balanced_thought: String,
}

impl ThoughtRecordDraft {
    /// Stamps the draft, producing an immutable record.
    pub fn into_record(self, created_at: DateTime<Utc>) -> ThoughtRecord {
        ThoughtRecord {
            situation: self.situation,
            automatic_thought: self.automatic_thought,
            emotion: self.emotion,
            intensity: self.intensity,
            evidence_for: self.evidence_for,
            evidence_against: self.evidence_against,
            balanced_thought: self.balanced_thought,
            created_at,
        }
    }
}

/// A structured CBT journaling entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtRecord {
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: Emotion,
    pub intensity: Intensity,
    pub evidence_for: String,
    pub evidence_against: String,
    pub balanced_thought: String,
    pub created_at: DateTime<Utc>,
}

impl ThoughtRecord {
    /// The collapsed header shown for a record, e.g. `Anxiety — I will fail (70%)`.
    pub fn summary(&self) -> String {
        format!(
            "{} — {} ({}%)",
            self.emotion,
            self.automatic_thought,
            self.intensity.value()
        )
    }
}

//=========================================================================================
// Behavioral Activation
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Importance {
    #[default]
    Low,
    Medium,
    High,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Importance::Low, Importance::Medium, Importance::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "Low",
            Importance::Medium => "Medium",
            Importance::High => "High",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Importance::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel {
                kind: "importance",
                value: s.to_string(),
            })
    }
}

/// A scheduled, rewarding activity tracked as a checklist item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub description: String,
    pub importance: Importance,
    pub created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn new(description: String, importance: Importance, created_at: DateTime<Utc>) -> Self {
        Self {
            description,
            importance,
            created_at,
            completed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Marks the activity done. Returns `false` if it already was, keeping the
    /// first completion time.
    pub fn complete(&mut self, at: DateTime<Utc>) -> bool {
        if self.completed_at.is_some() {
            return false;
        }
        self.completed_at = Some(at);
        true
    }
}

//=========================================================================================
// Safety Plan
//=========================================================================================

/// A personal crisis-mitigation document. Saved wholesale, no history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafetyPlan {
    pub warning_signs: String,
    pub coping_strategies: String,
    pub contacts: String,
}
