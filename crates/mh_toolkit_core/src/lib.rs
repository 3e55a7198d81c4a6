pub mod content;
pub mod domain;
pub mod ports;
pub mod quiz;
pub mod section;
pub mod store;
pub mod timer;

pub use domain::{
    Activity, Emotion, Importance, Intensity, SafetyPlan, Session, ThoughtRecord,
    ThoughtRecordDraft, UnknownLabel,
};
pub use ports::{Clock, PortError, PortResult, SessionRepository};
pub use section::Section;
pub use store::{CompletionOutcome, SessionStore, StoreError};
pub use timer::{BreathPhase, TimerFrame, TimerKind};
