//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{port_rejection, store_rejection};
use crate::web::{
    session::{self, SessionInfoResponse},
    state::{AppState, CurrentSession},
    views::{
        self, ActivityView, QuizQuestionView, QuizResultView, SafetyPlanView, SectionPage,
        SectionSummary, ThoughtRecordView,
    },
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use mh_toolkit_core::{
    content,
    domain::{Emotion, Importance, Intensity, SafetyPlan, ThoughtRecordDraft},
    quiz,
    section::Section,
    store::{CompletionOutcome, SessionStore},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sections_handler,
        section_handler,
        list_thought_records_handler,
        add_thought_record_handler,
        list_activities_handler,
        add_activity_handler,
        complete_activity_handler,
        get_safety_plan_handler,
        save_safety_plan_handler,
        export_safety_plan_handler,
        get_quiz_handler,
        submit_quiz_handler,
        worksheet_handler,
        session::get_session_handler,
        session::reset_session_handler,
    ),
    components(
        schemas(
            SectionSummary, SectionPage, ThoughtRecordForm, ThoughtRecordView, ActivityForm,
            AddActivityResponse, ActivityView, SafetyPlanForm, SaveSafetyPlanResponse,
            SafetyPlanView, QuizQuestionView, QuizSubmission, QuizResultView,
            SessionInfoResponse
        )
    ),
    tags(
        (name = "Mental Health Education Toolkit API", description = "Session-scoped endpoints for the toolkit's forms, checklists, quiz and exports.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// A thought record as submitted from the form. Omitted fields take the form's defaults.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct ThoughtRecordForm {
    pub situation: String,
    pub automatic_thought: String,
    /// One of Anxiety, Sadness, Anger, Guilt, Shame, Other. Defaults to Anxiety.
    pub emotion: Option<String>,
    /// 0-100; values outside the range are clamped. Defaults to 50.
    pub intensity: Option<i64>,
    pub evidence_for: String,
    pub evidence_against: String,
    pub balanced_thought: String,
}

impl ThoughtRecordForm {
    fn into_draft(self) -> Result<ThoughtRecordDraft, (StatusCode, String)> {
        let emotion = match self.emotion.as_deref() {
            Some(label) => label
                .parse::<Emotion>()
                .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
            None => Emotion::default(),
        };
        Ok(ThoughtRecordDraft {
            situation: self.situation,
            automatic_thought: self.automatic_thought,
            emotion,
            intensity: self
                .intensity
                .map(Intensity::clamped)
                .unwrap_or_default(),
            evidence_for: self.evidence_for,
            evidence_against: self.evidence_against,
            balanced_thought: self.balanced_thought,
        })
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct ActivityForm {
    pub description: String,
    /// One of Low, Medium, High. Defaults to Low.
    pub importance: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AddActivityResponse {
    /// False when the description was blank and nothing was added.
    pub added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub activities: Vec<ActivityView>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct SafetyPlanForm {
    pub warning_signs: String,
    pub coping_strategies: String,
    pub contacts: String,
}

#[derive(Serialize, ToSchema)]
pub struct SaveSafetyPlanResponse {
    pub message: String,
    pub plan: SafetyPlanView,
}

/// One selected option index (0-based) per question, in question order.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct QuizSubmission {
    pub answers: Vec<usize>,
}

//=========================================================================================
// Helpers
//=========================================================================================

async fn load_store(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<SessionStore, (StatusCode, String)> {
    app_state
        .sessions
        .load_store(session_id)
        .await
        .map_err(|e| port_rejection("Failed to load session", e))
}

async fn save_store(
    app_state: &AppState,
    session_id: Uuid,
    store: SessionStore,
) -> Result<(), (StatusCode, String)> {
    app_state
        .sessions
        .save_store(session_id, store)
        .await
        .map_err(|e| port_rejection("Failed to save session", e))
}

/// A UTF-8 plain-text attachment.
fn text_download(file_name: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}

//=========================================================================================
// Section Router
//=========================================================================================

/// List the toolkit's sections in navigation order.
#[utoipa::path(
    get,
    path = "/sections",
    responses((status = 200, description = "All sections", body = [SectionSummary]))
)]
pub async fn list_sections_handler() -> Json<Vec<SectionSummary>> {
    Json(Section::ALL.into_iter().map(SectionSummary::from).collect())
}

/// Render one section for the current session.
#[utoipa::path(
    get,
    path = "/sections/{section}",
    params(("section" = String, Path, description = "Section slug or label, e.g. `cbt`.")),
    responses(
        (status = 200, description = "Rendered section", body = SectionPage),
        (status = 404, description = "Unknown section")
    )
)]
pub async fn section_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let section = section
        .parse::<Section>()
        .map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?;
    let store = load_store(&app_state, session_id).await?;
    Ok(Json(views::render_section(section, &store)))
}

//=========================================================================================
// Thought Records
//=========================================================================================

/// The five most recent thought records, newest first.
#[utoipa::path(
    get,
    path = "/thought-records",
    responses((status = 200, description = "Recent thought records", body = [ThoughtRecordView]))
)]
pub async fn list_thought_records_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = load_store(&app_state, session_id).await?;
    Ok(Json(views::recent_thought_records(&store)))
}

/// Save a thought record.
#[utoipa::path(
    post,
    path = "/thought-records",
    request_body = ThoughtRecordForm,
    responses(
        (status = 201, description = "Record saved; returns the recent records", body = [ThoughtRecordView]),
        (status = 400, description = "Unknown emotion")
    )
)]
pub async fn add_thought_record_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    Json(form): Json<ThoughtRecordForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let draft = form.into_draft()?;
    let mut store = load_store(&app_state, session_id).await?;

    store.add_thought_record(draft.into_record(app_state.clock.now()));
    info!(
        "Session {} saved thought record #{}",
        session_id,
        store.thought_records().len()
    );

    let recent = views::recent_thought_records(&store);
    save_store(&app_state, session_id, store).await?;
    Ok((StatusCode::CREATED, Json(recent)))
}

//=========================================================================================
// Behavioral Activation
//=========================================================================================

/// All planned activities in insertion order.
#[utoipa::path(
    get,
    path = "/activities",
    responses((status = 200, description = "Planned activities", body = [ActivityView]))
)]
pub async fn list_activities_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = load_store(&app_state, session_id).await?;
    Ok(Json(views::activities(&store)))
}

/// Add an activity. A blank description is ignored.
#[utoipa::path(
    post,
    path = "/activities",
    request_body = ActivityForm,
    responses(
        (status = 201, description = "Activity added", body = AddActivityResponse),
        (status = 200, description = "Blank description; nothing added", body = AddActivityResponse),
        (status = 400, description = "Unknown importance")
    )
)]
pub async fn add_activity_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    Json(form): Json<ActivityForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let importance = match form.importance.as_deref() {
        Some(label) => label
            .parse::<Importance>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Importance::default(),
    };

    let mut store = load_store(&app_state, session_id).await?;
    let Some(index) = store.add_activity(&form.description, importance, app_state.clock.now())
    else {
        return Ok((
            StatusCode::OK,
            Json(AddActivityResponse {
                added: false,
                message: None,
                activities: views::activities(&store),
            }),
        ));
    };
    info!("Session {} added activity #{}", session_id, index);

    let activities = views::activities(&store);
    save_store(&app_state, session_id, store).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddActivityResponse {
            added: true,
            message: Some(content::ACTIVITY_ADDED.to_string()),
            activities,
        }),
    ))
}

/// Mark an activity done. Already-done activities are left unchanged.
#[utoipa::path(
    post,
    path = "/activities/{index}/done",
    params(("index" = usize, Path, description = "Checklist position of the activity.")),
    responses(
        (status = 200, description = "The activity after the update", body = ActivityView),
        (status = 404, description = "No activity at that position")
    )
)]
pub async fn complete_activity_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut store = load_store(&app_state, session_id).await?;

    let outcome = store
        .mark_activity_done(index, app_state.clock.now())
        .map_err(|e| {
            warn!("Session {}: {}", session_id, e);
            store_rejection(e)
        })?;

    let view = ActivityView::new(index, &store.activities()[index]);
    if outcome == CompletionOutcome::Completed {
        info!("Session {} completed activity #{}", session_id, index);
        save_store(&app_state, session_id, store).await?;
    }
    Ok(Json(view))
}

//=========================================================================================
// Safety Plan
//=========================================================================================

#[utoipa::path(
    get,
    path = "/safety-plan",
    responses((status = 200, description = "The current safety plan", body = SafetyPlanView))
)]
pub async fn get_safety_plan_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = load_store(&app_state, session_id).await?;
    Ok(Json(SafetyPlanView::from(store.safety_plan())))
}

/// Replace the safety plan. Omitted fields are saved as empty.
#[utoipa::path(
    put,
    path = "/safety-plan",
    request_body = SafetyPlanForm,
    responses((status = 200, description = "Plan saved", body = SaveSafetyPlanResponse))
)]
pub async fn save_safety_plan_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
    Json(form): Json<SafetyPlanForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut store = load_store(&app_state, session_id).await?;
    store.update_safety_plan(SafetyPlan {
        warning_signs: form.warning_signs,
        coping_strategies: form.coping_strategies,
        contacts: form.contacts,
    });
    info!("Session {} saved its safety plan", session_id);

    let plan = SafetyPlanView::from(store.safety_plan());
    save_store(&app_state, session_id, store).await?;
    Ok(Json(SaveSafetyPlanResponse {
        message: content::SAFETY_PLAN_SAVED.to_string(),
        plan,
    }))
}

/// Download the safety plan as `safety_plan.txt`.
#[utoipa::path(
    get,
    path = "/safety-plan/export",
    responses((status = 200, description = "Plain-text safety plan", content_type = "text/plain", body = String))
)]
pub async fn export_safety_plan_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentSession(session_id)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = load_store(&app_state, session_id).await?;
    Ok(text_download(
        content::SAFETY_PLAN_FILE_NAME,
        content::safety_plan_text(store.safety_plan()),
    ))
}

//=========================================================================================
// Quiz and Resources
//=========================================================================================

#[utoipa::path(
    get,
    path = "/quiz",
    responses((status = 200, description = "Quiz questions without answers", body = [QuizQuestionView]))
)]
pub async fn get_quiz_handler() -> Json<Vec<QuizQuestionView>> {
    Json(views::quiz_questions())
}

/// Score a quiz submission and reveal the answers. Nothing is stored.
#[utoipa::path(
    post,
    path = "/quiz",
    request_body = QuizSubmission,
    responses((status = 200, description = "Score and answer key", body = QuizResultView))
)]
pub async fn submit_quiz_handler(Json(submission): Json<QuizSubmission>) -> Json<QuizResultView> {
    Json(quiz::score(&submission.answers).into())
}

/// Download the printable worksheet as `mh_worksheet.txt`.
#[utoipa::path(
    get,
    path = "/worksheet",
    responses((status = 200, description = "Plain-text worksheet", content_type = "text/plain", body = String))
)]
pub async fn worksheet_handler() -> impl IntoResponse {
    text_download(content::WORKSHEET_FILE_NAME, content::WORKSHEET.to_string())
}
