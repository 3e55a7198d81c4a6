//! services/api/src/web/views.rs
//!
//! Read-only view models rendered from a session's store, and the section
//! router that picks which one to build.

use chrono::{DateTime, SecondsFormat, Utc};
use mh_toolkit_core::content::{self, ContentBlock, Link};
use mh_toolkit_core::domain::{Activity, Emotion, Importance, Intensity, SafetyPlan, ThoughtRecord};
use mh_toolkit_core::quiz::{QuizOutcome, QuizQuestion, QUESTIONS};
use mh_toolkit_core::section::Section;
use mh_toolkit_core::store::SessionStore;
use serde::Serialize;
use utoipa::ToSchema;

/// Placeholder shown for empty optional text.
const EMPTY_FIELD: &str = "—";

pub const TIMER_WS_PATH: &str = "/timers/ws";
pub const SAFETY_PLAN_EXPORT_PATH: &str = "/safety-plan/export";
pub const WORKSHEET_PATH: &str = "/worksheet";

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_FIELD
    } else {
        text
    }
}

//=========================================================================================
// Record Views
//=========================================================================================

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub slug: String,
    pub label: String,
}

impl From<Section> for SectionSummary {
    fn from(section: Section) -> Self {
        Self {
            slug: section.slug().to_string(),
            label: section.label().to_string(),
        }
    }
}

/// A thought record as a collapsible entry: `summary` is the header, `details` the body.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ThoughtRecordView {
    pub summary: String,
    pub situation: String,
    pub automatic_thought: String,
    pub emotion: String,
    pub intensity: u8,
    pub evidence_for: String,
    pub evidence_against: String,
    pub balanced_thought: String,
    pub created_at: String,
    pub details: Vec<String>,
}

impl From<&ThoughtRecord> for ThoughtRecordView {
    fn from(record: &ThoughtRecord) -> Self {
        let created_at = timestamp(record.created_at);
        let details = vec![
            format!("Situation: {}", record.situation),
            format!("Evidence for: {}", or_placeholder(&record.evidence_for)),
            format!("Evidence against: {}", or_placeholder(&record.evidence_against)),
            format!("Balanced thought: {}", or_placeholder(&record.balanced_thought)),
            format!("Saved: {}", created_at),
        ];
        Self {
            summary: record.summary(),
            situation: record.situation.clone(),
            automatic_thought: record.automatic_thought.clone(),
            emotion: record.emotion.to_string(),
            intensity: record.intensity.value(),
            evidence_for: record.evidence_for.clone(),
            evidence_against: record.evidence_against.clone(),
            balanced_thought: record.balanced_thought.clone(),
            created_at,
            details,
        }
    }
}

pub fn recent_thought_records(store: &SessionStore) -> Vec<ThoughtRecordView> {
    store
        .recent_thought_records()
        .map(ThoughtRecordView::from)
        .collect()
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ActivityView {
    /// Position in the checklist; used to mark the activity done.
    pub index: usize,
    pub description: String,
    pub importance: String,
    pub done: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// `✅ Done` once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ActivityView {
    pub fn new(index: usize, activity: &Activity) -> Self {
        Self {
            index,
            description: activity.description.clone(),
            importance: activity.importance.to_string(),
            done: activity.is_done(),
            created_at: timestamp(activity.created_at),
            completed_at: activity.completed_at().map(timestamp),
            status: activity.is_done().then(|| "✅ Done".to_string()),
        }
    }
}

pub fn activities(store: &SessionStore) -> Vec<ActivityView> {
    store
        .activities()
        .iter()
        .enumerate()
        .map(|(i, a)| ActivityView::new(i, a))
        .collect()
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct SafetyPlanView {
    pub warning_signs: String,
    pub coping_strategies: String,
    pub contacts: String,
}

impl From<&SafetyPlan> for SafetyPlanView {
    fn from(plan: &SafetyPlan) -> Self {
        Self {
            warning_signs: plan.warning_signs.clone(),
            coping_strategies: plan.coping_strategies.clone(),
            contacts: plan.contacts.clone(),
        }
    }
}

//=========================================================================================
// Quiz Views
//=========================================================================================

/// A question as shown to the user; the answer stays on the server.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct QuizQuestionView {
    pub number: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

impl QuizQuestionView {
    fn new(index: usize, question: &QuizQuestion) -> Self {
        Self {
            number: index + 1,
            prompt: format!("Q{}. {}", index + 1, question.prompt),
            options: question.options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

pub fn quiz_questions() -> Vec<QuizQuestionView> {
    QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| QuizQuestionView::new(i, q))
        .collect()
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct QuizResultView {
    pub score: usize,
    pub total: usize,
    pub message: String,
    pub correct: Vec<bool>,
    pub answer_key: Vec<String>,
}

impl From<QuizOutcome> for QuizResultView {
    fn from(outcome: QuizOutcome) -> Self {
        Self {
            message: format!("You scored {}/{}", outcome.score, outcome.total),
            score: outcome.score,
            total: outcome.total,
            correct: outcome.correct,
            answer_key: outcome.answer_key,
        }
    }
}

//=========================================================================================
// Section Views
//=========================================================================================

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ContentBlockView {
    pub heading: String,
    pub lines: Vec<String>,
}

impl From<&ContentBlock> for ContentBlockView {
    fn from(block: &ContentBlock) -> Self {
        Self {
            heading: block.heading.to_string(),
            lines: block.lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct LinkView {
    pub title: String,
    pub url: String,
}

impl From<&Link> for LinkView {
    fn from(link: &Link) -> Self {
        Self {
            title: link.title.to_string(),
            url: link.url.to_string(),
        }
    }
}

/// The body of one section.
#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionView {
    Psychoeducation {
        blocks: Vec<ContentBlockView>,
    },
    ThoughtRecord {
        intro: String,
        emotions: Vec<String>,
        default_intensity: u8,
        recent_records: Vec<ThoughtRecordView>,
    },
    Mindfulness {
        intro: String,
        box_breathing_title: String,
        grounding_title: String,
        grounding_instructions: String,
        timer_socket: String,
    },
    BehavioralActivation {
        intro: String,
        importance_levels: Vec<String>,
        activities: Vec<ActivityView>,
        #[serde(skip_serializing_if = "Option::is_none")]
        empty_message: Option<String>,
    },
    SafetyPlan {
        intro: String,
        plan: SafetyPlanView,
        warning: String,
        export_path: String,
    },
    Quiz {
        intro: String,
        questions: Vec<QuizQuestionView>,
    },
    Resources {
        notes: Vec<String>,
        links: Vec<LinkView>,
        worksheet_path: String,
    },
}

/// A fully rendered page: the selected section plus the shared chrome.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct SectionPage {
    pub title: String,
    pub section: SectionSummary,
    pub heading: String,
    pub content: SectionView,
    pub footer: String,
}

/// Dispatches the selected section to its renderer.
pub fn render_section(section: Section, store: &SessionStore) -> SectionPage {
    let body = match section {
        Section::Psychoeducation => SectionView::Psychoeducation {
            blocks: content::PSYCHOEDUCATION.iter().map(ContentBlockView::from).collect(),
        },
        Section::CognitiveTechniques => SectionView::ThoughtRecord {
            intro: content::CBT_INTRO.to_string(),
            emotions: Emotion::ALL.iter().map(|e| e.to_string()).collect(),
            default_intensity: Intensity::default().value(),
            recent_records: recent_thought_records(store),
        },
        Section::Mindfulness => SectionView::Mindfulness {
            intro: content::MINDFULNESS_INTRO.to_string(),
            box_breathing_title: content::BOX_BREATHING_TITLE.to_string(),
            grounding_title: content::GROUNDING_TITLE.to_string(),
            grounding_instructions: content::GROUNDING_INSTRUCTIONS.to_string(),
            timer_socket: TIMER_WS_PATH.to_string(),
        },
        Section::BehavioralActivation => {
            let activities = activities(store);
            SectionView::BehavioralActivation {
                intro: content::ACTIVATION_INTRO.to_string(),
                importance_levels: Importance::ALL.iter().map(|i| i.to_string()).collect(),
                empty_message: activities
                    .is_empty()
                    .then(|| content::NO_ACTIVITIES.to_string()),
                activities,
            }
        }
        Section::SafetyPlan => SectionView::SafetyPlan {
            intro: content::SAFETY_PLAN_INTRO.to_string(),
            plan: store.safety_plan().into(),
            warning: content::SAFETY_PLAN_WARNING.to_string(),
            export_path: SAFETY_PLAN_EXPORT_PATH.to_string(),
        },
        Section::QuickQuiz => SectionView::Quiz {
            intro: content::QUIZ_INTRO.to_string(),
            questions: quiz_questions(),
        },
        Section::Resources => SectionView::Resources {
            notes: content::RESOURCE_NOTES.iter().map(|n| n.to_string()).collect(),
            links: content::RESOURCE_LINKS.iter().map(LinkView::from).collect(),
            worksheet_path: WORKSHEET_PATH.to_string(),
        },
    };

    SectionPage {
        title: content::APP_TITLE.to_string(),
        section: section.into(),
        heading: section.heading().to_string(),
        content: body,
        footer: content::FOOTER_DISCLAIMER.to_string(),
    }
}
