pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::matching::handlers as matching;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog & match API
        .route("/api/v1/roles", get(matching::handle_list_roles))
        .route(
            "/api/v1/roles/suggestions",
            get(matching::handle_suggestions),
        )
        .route("/api/v1/resources", get(matching::handle_resources))
        .route("/api/match", post(matching::handle_match))
        // Page sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/query", put(sessions::handle_edit_query))
        .route(
            "/api/v1/sessions/:id/choose",
            post(sessions::handle_choose_suggestion),
        )
        .route("/api/v1/sessions/:id/submit", post(sessions::handle_submit))
        .with_state(state)
}
