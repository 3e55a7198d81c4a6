//! Handler-level tests for the session-scoped REST endpoints.
//!
//! Handlers are called directly with their extractors, the way the router
//! would after the session middleware has resolved a session.

use api_lib::{
    adapters::{FixedClock, InMemorySessionAdapter},
    config::Config,
    web::{
        rest::{
            add_activity_handler, add_thought_record_handler, complete_activity_handler,
            export_safety_plan_handler, get_safety_plan_handler, list_activities_handler,
            list_sections_handler, list_thought_records_handler, save_safety_plan_handler,
            section_handler, submit_quiz_handler, worksheet_handler, ActivityForm,
            QuizSubmission, SafetyPlanForm, ThoughtRecordForm,
        },
        session::reset_session_handler,
        state::{AppState, CurrentSession},
    },
};
use axum::{
    body::to_bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{Duration, TimeZone, Utc};
use mh_toolkit_core::ports::SessionRepository;
use serde_json::Value;
use std::sync::Arc;

struct Harness {
    state: Arc<AppState>,
    sessions: Arc<InMemorySessionAdapter>,
    clock: Arc<FixedClock>,
    session: CurrentSession,
}

impl Harness {
    async fn new() -> Self {
        let config = Config::default();
        let sessions = Arc::new(InMemorySessionAdapter::new(config.session_ttl));
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        ));
        let state = Arc::new(AppState {
            sessions: sessions.clone(),
            clock: clock.clone(),
            config: Arc::new(config),
        });
        let session = sessions
            .create_session(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())
            .await
            .unwrap();
        Self {
            state,
            sessions,
            clock,
            session: CurrentSession(session.id),
        }
    }

    fn state(&self) -> State<Arc<AppState>> {
        State(self.state.clone())
    }

    fn session(&self) -> Extension<CurrentSession> {
        Extension(self.session)
    }

    async fn add_thought(&self, thought: &str, intensity: i64) -> Response {
        add_thought_record_handler(
            self.state(),
            self.session(),
            Json(ThoughtRecordForm {
                automatic_thought: thought.to_string(),
                intensity: Some(intensity),
                ..Default::default()
            }),
        )
        .await
        .into_response()
    }

    async fn add_activity(&self, description: &str, importance: Option<&str>) -> Response {
        add_activity_handler(
            self.state(),
            self.session(),
            Json(ActivityForm {
                description: description.to_string(),
                importance: importance.map(str::to_string),
            }),
        )
        .await
        .into_response()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

//=========================================================================================
// Thought Records
//=========================================================================================

#[tokio::test]
async fn thought_record_is_saved_with_clamped_intensity() {
    let h = Harness::new().await;

    let response = h.add_thought("Nobody likes me", 150).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = body_json(response).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["intensity"], 100);
    assert_eq!(records[0]["emotion"], "Anxiety");
    assert_eq!(records[0]["summary"], "Anxiety — Nobody likes me (100%)");
    assert!(records[0]["created_at"]
        .as_str()
        .unwrap()
        .starts_with("2024-06-01T10:00:00"));
}

#[tokio::test]
async fn empty_thought_record_is_accepted() {
    let h = Harness::new().await;
    let response = add_thought_record_handler(
        h.state(),
        h.session(),
        Json(ThoughtRecordForm::default()),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = body_json(response).await;
    assert_eq!(records[0]["intensity"], 50);
    assert_eq!(records[0]["details"][1], "Evidence for: —");
}

#[tokio::test]
async fn unknown_emotion_is_rejected_without_saving() {
    let h = Harness::new().await;
    let response = add_thought_record_handler(
        h.state(),
        h.session(),
        Json(ThoughtRecordForm {
            emotion: Some("Joy".to_string()),
            ..Default::default()
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let store = h.sessions.load_store(h.session.0).await.unwrap();
    assert!(store.thought_records().is_empty());
}

#[tokio::test]
async fn recent_records_are_newest_first_and_capped() {
    let h = Harness::new().await;
    for i in 0..6 {
        h.add_thought(&format!("thought {i}"), 10 * i).await;
        h.clock.advance(Duration::minutes(1));
    }

    let response = list_thought_records_handler(h.state(), h.session())
        .await
        .into_response();
    let records = body_json(response).await;
    let thoughts: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["automatic_thought"].as_str().unwrap())
        .collect();
    assert_eq!(
        thoughts,
        ["thought 5", "thought 4", "thought 3", "thought 2", "thought 1"]
    );

    // All six are kept; only the view is capped.
    let store = h.sessions.load_store(h.session.0).await.unwrap();
    assert_eq!(store.thought_records().len(), 6);
}

//=========================================================================================
// Activities
//=========================================================================================

#[tokio::test]
async fn blank_activity_is_silently_ignored() {
    let h = Harness::new().await;
    let response = h.add_activity("   ", Some("High")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["added"], false);
    assert!(body["activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn activity_is_added_with_default_importance() {
    let h = Harness::new().await;
    let response = h.add_activity(" short walk ", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["added"], true);
    assert_eq!(body["message"], "Activity added.");
    assert_eq!(body["activities"][0]["description"], "short walk");
    assert_eq!(body["activities"][0]["importance"], "Low");
    assert_eq!(body["activities"][0]["done"], false);
}

#[tokio::test]
async fn marking_done_stamps_completion_once() {
    let h = Harness::new().await;
    h.add_activity("call a friend", Some("medium")).await;
    h.clock.advance(Duration::hours(2));

    let first = complete_activity_handler(h.state(), h.session(), Path(0))
        .await
        .into_response();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["done"], true);
    assert_eq!(first["status"], "✅ Done");
    let stamped = first["completed_at"].as_str().unwrap().to_string();
    assert!(stamped.starts_with("2024-06-01T12:00:00"));

    h.clock.advance(Duration::hours(1));
    let second = complete_activity_handler(h.state(), h.session(), Path(0))
        .await
        .into_response();
    let second = body_json(second).await;
    assert_eq!(second["done"], true);
    assert_eq!(second["completed_at"], stamped.as_str());
}

#[tokio::test]
async fn marking_unknown_activity_is_not_found() {
    let h = Harness::new().await;
    h.add_activity("read", None).await;

    let response = complete_activity_handler(h.state(), h.session(), Path(4))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = list_activities_handler(h.state(), h.session())
        .await
        .into_response();
    let activities = body_json(response).await;
    assert_eq!(activities.as_array().unwrap().len(), 1);
    assert_eq!(activities[0]["done"], false);
}

//=========================================================================================
// Safety Plan and Exports
//=========================================================================================

#[tokio::test]
async fn safety_plan_save_and_export() {
    let h = Harness::new().await;
    let response = save_safety_plan_handler(
        h.state(),
        h.session(),
        Json(SafetyPlanForm {
            warning_signs: "A".to_string(),
            coping_strategies: "B".to_string(),
            contacts: "C".to_string(),
        }),
    )
    .await
    .into_response();
    let body = body_json(response).await;
    assert_eq!(body["message"], "Safety plan saved.");

    let response = export_safety_plan_handler(h.state(), h.session())
        .await
        .into_response();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"safety_plan.txt\""
    );

    let text = body_text(response).await;
    let warning = text.find("Warning signs:\nA").unwrap();
    let coping = text.find("Coping strategies:\nB").unwrap();
    let contacts = text.find("Contacts & supports:\nC").unwrap();
    assert!(warning < coping && coping < contacts);
}

#[tokio::test]
async fn saving_plan_overwrites_every_field() {
    let h = Harness::new().await;
    for form in [
        SafetyPlanForm {
            warning_signs: "old signs".to_string(),
            coping_strategies: "old coping".to_string(),
            contacts: "old contacts".to_string(),
        },
        SafetyPlanForm {
            warning_signs: "new signs".to_string(),
            ..Default::default()
        },
    ] {
        let _ = save_safety_plan_handler(h.state(), h.session(), Json(form)).await;
    }

    let response = get_safety_plan_handler(h.state(), h.session())
        .await
        .into_response();
    let plan = body_json(response).await;
    assert_eq!(plan["warning_signs"], "new signs");
    assert_eq!(plan["coping_strategies"], "");
    assert_eq!(plan["contacts"], "");
}

#[tokio::test]
async fn worksheet_is_constant_across_sessions() {
    let h = Harness::new().await;
    let before = body_text(worksheet_handler().await.into_response()).await;

    h.add_activity("walk", None).await;
    h.add_thought("thought", 30).await;

    let response = worksheet_handler().await.into_response();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"mh_worksheet.txt\""
    );
    let after = body_text(response).await;
    assert_eq!(before, after);
    assert!(after.contains("3) Activity I scheduled:"));
}

//=========================================================================================
// Quiz, Sections and Session Lifecycle
//=========================================================================================

#[tokio::test]
async fn quiz_scores_known_answers() {
    let Json(result) = submit_quiz_handler(Json(QuizSubmission {
        answers: vec![1, 2, 1],
    }))
    .await;
    assert_eq!(result.score, 3);
    assert_eq!(result.message, "You scored 3/3");

    let Json(result) = submit_quiz_handler(Json(QuizSubmission {
        answers: vec![0, 0, 0],
    }))
    .await;
    assert_eq!(result.score, 0);
    assert_eq!(result.answer_key.len(), 3);
}

#[tokio::test]
async fn sections_are_listed_in_navigation_order() {
    let Json(sections) = list_sections_handler().await;
    let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Psychoeducation",
            "Cognitive Techniques (CBT)",
            "Mindfulness & Relaxation",
            "Behavioral Activation",
            "Safety Plan",
            "Quick Quiz",
            "Resources",
        ]
    );
}

#[tokio::test]
async fn section_router_renders_session_state() {
    let h = Harness::new().await;
    h.add_thought("I always mess up", 70).await;

    let response = section_handler(h.state(), h.session(), Path("cbt".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["heading"], "CBT: Thought Record");
    assert_eq!(page["content"]["kind"], "thought_record");
    assert_eq!(
        page["content"]["recent_records"][0]["summary"],
        "Anxiety — I always mess up (70%)"
    );

    let response = section_handler(h.state(), h.session(), Path("settings".to_string()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_discards_the_session() {
    let h = Harness::new().await;
    h.add_activity("walk", None).await;

    let response = reset_session_handler(h.state(), h.session())
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    assert!(h.sessions.load_store(h.session.0).await.is_err());
    let response = list_activities_handler(h.state(), h.session())
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
