//! crates/mh_toolkit_core/src/store.rs
//!
//! The per-session record store: append-only thought records, a checklist of
//! activities and the safety plan singleton.

use crate::domain::{Activity, Importance, SafetyPlan, ThoughtRecord};
use chrono::{DateTime, Utc};

/// Number of thought records shown in the "recent" list.
pub const RECENT_THOUGHT_RECORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Activity index {index} is out of range ({len} activities)")]
    ActivityOutOfRange { index: usize, len: usize },
}

/// Outcome of marking an activity done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed,
    AlreadyDone,
}

/// All state owned by one session. Nothing is ever removed from it.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    thought_records: Vec<ThoughtRecord>,
    activities: Vec<Activity>,
    safety_plan: SafetyPlan,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_thought_record(&mut self, record: ThoughtRecord) {
        self.thought_records.push(record);
    }

    /// Adds an activity with a trimmed description. Blank descriptions are
    /// ignored and `None` is returned; otherwise the new index is returned.
    pub fn add_activity(
        &mut self,
        description: &str,
        importance: Importance,
        now: DateTime<Utc>,
    ) -> Option<usize> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        self.activities
            .push(Activity::new(description.to_string(), importance, now));
        Some(self.activities.len() - 1)
    }

    pub fn mark_activity_done(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome, StoreError> {
        let len = self.activities.len();
        let activity = self
            .activities
            .get_mut(index)
            .ok_or(StoreError::ActivityOutOfRange { index, len })?;

        if activity.complete(now) {
            Ok(CompletionOutcome::Completed)
        } else {
            Ok(CompletionOutcome::AlreadyDone)
        }
    }

    pub fn update_safety_plan(&mut self, plan: SafetyPlan) {
        self.safety_plan = plan;
    }

    pub fn thought_records(&self) -> &[ThoughtRecord] {
        &self.thought_records
    }

    /// The most recent records, newest first.
    pub fn recent_thought_records(&self) -> impl Iterator<Item = &ThoughtRecord> {
        self.thought_records
            .iter()
            .rev()
            .take(RECENT_THOUGHT_RECORDS)
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn safety_plan(&self) -> &SafetyPlan {
        &self.safety_plan
    }
}
