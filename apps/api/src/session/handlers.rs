//! Axum route handlers for page sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::catalog::RESOURCES;
use crate::models::role::{MatchRecord, ResourceLink};
use crate::session::page::Phase;
use crate::session::store::PageSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditQueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ChooseSuggestionRequest {
    pub suggestion: String,
}

/// Everything the page needs to render one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub query: String,
    pub selected_role: Option<String>,
    pub suggestions: Vec<String>,
    pub results: Option<Vec<MatchRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<&'static [ResourceLink]>,
    pub error: Option<String>,
    pub submitting: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

async fn render(state: &AppState, session: &PageSession) -> Result<SessionView, AppError> {
    let page = &session.page;
    let suggestions = state.matcher.suggest(&page.query).await?;
    Ok(SessionView {
        session_id: session.id,
        phase: page.phase(),
        query: page.query.clone(),
        selected_role: page.selected_role.clone(),
        suggestions,
        results: page.results.clone(),
        resources: page.results.as_ref().map(|_| &RESOURCES[..]),
        error: page.error.clone(),
        submitting: page.submitting,
        created_at: session.created_at,
        updated_at: session.updated_at,
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let (_, handle) = state.sessions.create().await;
    let session = handle.lock().await;
    let view = render(&state, &session).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.checkout(id).await?;
    Ok(Json(render(&state, &session).await?))
}

/// PUT /api/v1/sessions/:id/query
pub async fn handle_edit_query(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditQueryRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.sessions.checkout(id).await?;
    session.page.edit_query(req.query);
    session.touch();
    Ok(Json(render(&state, &session).await?))
}

/// POST /api/v1/sessions/:id/choose
pub async fn handle_choose_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChooseSuggestionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.sessions.checkout(id).await?;
    session.page.choose_suggestion(req.suggestion);
    session.touch();
    Ok(Json(render(&state, &session).await?))
}

/// POST /api/v1/sessions/:id/submit
///
/// Validation and empty-result outcomes are reported in the view, not as
/// HTTP errors; the page stays interactive. While the matcher runs the
/// session stays readable and reports `phase: "submitting"`; a second
/// submit in that window is refused with 409.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.submit(id, state.matcher.as_ref()).await?;
    Ok(Json(render(&state, &session).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
