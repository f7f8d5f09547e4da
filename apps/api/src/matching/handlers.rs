//! Axum route handlers for the catalog and match API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::catalog::{RESOURCES, ROLE_CATALOG};
use crate::matching::resolver::no_matches_message;
use crate::models::role::{MatchRecord, ResourceLink};
use crate::session::page::EMPTY_ROLE_MESSAGE;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub results: Vec<MatchRecord>,
    pub resources: &'static [ResourceLink],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub resources: &'static [ResourceLink],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: ROLE_CATALOG.to_vec(),
    })
}

/// GET /api/v1/roles/suggestions?q=
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let suggestions = state.matcher.suggest(&params.q).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

/// POST /api/match
///
/// Resolves a role to its match records. An unknown role is not an error:
/// it returns an empty list with the guidance message.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let role = request.role.trim();
    if role.is_empty() {
        return Err(AppError::Validation(EMPTY_ROLE_MESSAGE.to_string()));
    }

    let results = state.matcher.resolve(role).await?;
    info!("Matched '{}' to {} roles", role, results.len());

    let message = results.is_empty().then(no_matches_message);
    Ok(Json(MatchResponse {
        results,
        resources: &RESOURCES,
        message,
    }))
}

/// GET /api/v1/resources
pub async fn handle_resources() -> Json<ResourcesResponse> {
    Json(ResourcesResponse {
        resources: &RESOURCES,
    })
}
