// [apps/server/src/routes.rs]
use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{auth_rest, incidents_rest, session, users_rest};
use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth_rest::register))
        .route("/login", post(auth_rest::login))
        .route("/me", get(auth_rest::me));

    let incident_routes = Router::new()
        .route("/", get(incidents_rest::list).post(incidents_rest::create))
        .route("/:incident_id", get(incidents_rest::get))
        .route("/:incident_id/status", patch(incidents_rest::update_status))
        .route("/:incident_id/assignees", post(incidents_rest::update_assignees))
        .route("/:incident_id/notes", post(incidents_rest::add_note));

    let user_routes = Router::new()
        .route("/", get(users_rest::list))
        .route("/:user_id", get(users_rest::get))
        .route("/:user_id/role", patch(users_rest::set_role));

    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", auth_routes)
                .nest("/incidents", incident_routes)
                .nest("/users", user_routes)
                .route("/stream", get(session::handler)),
        )
        .layer(cors)
        .with_state(state)
}
