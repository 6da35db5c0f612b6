use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use warroom_auth::{AuthenticatedPrincipal, SessionClaims, SessionConfig, SessionVerifier};
use warroom_domain::commands::CreateIncidentInput;
use warroom_domain::incident::{Severity, Status};
use warroom_domain::principal::Role;
use warroom_server::config::AppConfig;
use warroom_server::handlers::{auth_rest, incidents_rest, users_rest};
use warroom_server::state::AppState;
use warroom_store::{PresenceRepository, StoreClient};

async fn test_state() -> AppState {
    let config = AppConfig {
        database_url: ":memory:".to_string(),
        turso_auth_token: None,
        session_signing_secret: "test-only-secret".to_string(),
        session_token_ttl_seconds: 3600,
        cors_allowed_origin: None,
        port: 0,
        presence_ttl_seconds: 300,
        presence_heartbeat_seconds: 60,
        focus_throttle_millis: 100,
    };

    let store = StoreClient::connect(&config.database_url, config.turso_auth_token.clone()).await.unwrap();
    let verifier = SessionVerifier::new(SessionConfig::new(config.session_signing_secret.clone(), Some(config.session_token_ttl_seconds)).unwrap());
    let presence_store = PresenceRepository::new(store.clone());

    AppState::new(config, store, verifier, presence_store)
}

fn principal_for(id: Uuid, role: Role) -> AuthenticatedPrincipal {
    let now = Utc::now().timestamp();
    AuthenticatedPrincipal {
        claims: SessionClaims { sub: id, role, iat: now, exp: now + 3600 },
    }
}

#[tokio::test]
async fn register_then_create_incident_end_to_end() {
    let state = test_state().await;

    let registered = auth_rest::register(
        State(state.clone()),
        Json(auth_rest::RegisterRequest {
            display_name: "Ada Responder".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            role: Some(Role::Responder),
        }),
    )
    .await
    .unwrap();

    assert_eq!(registered.user.role, Role::Responder);
    let principal = principal_for(registered.user.id, Role::Responder);

    let created = incidents_rest::create(
        State(state.clone()),
        principal.clone(),
        Json(CreateIncidentInput {
            title: "Checkout service is returning 503s".to_string(),
            severity: Severity::Critical,
            description: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(created.incident.status, Status::Investigating);
    assert_eq!(created.incident.commander, registered.user.id);

    let detail = incidents_rest::get(State(state.clone()), principal.clone(), Path(created.incident.id)).await.unwrap();
    assert_eq!(detail.incident.id, created.incident.id);
    assert_eq!(detail.updates.len(), 1, "creation seeds the null -> investigating audit record");
}

#[tokio::test]
async fn viewers_are_forbidden_from_creating_incidents() {
    let state = test_state().await;

    let registered = auth_rest::register(
        State(state.clone()),
        Json(auth_rest::RegisterRequest {
            display_name: "Observer Only".to_string(),
            email: "observer@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            role: Some(Role::Viewer),
        }),
    )
    .await
    .unwrap();

    let principal = principal_for(registered.user.id, Role::Viewer);
    let result = incidents_rest::create(
        State(state),
        principal,
        Json(CreateIncidentInput { title: "Should not be allowed".to_string(), severity: Severity::Low, description: None }),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn status_transitions_follow_the_table_and_stay_auditable() {
    let state = test_state().await;

    let responder = auth_rest::register(
        State(state.clone()),
        Json(auth_rest::RegisterRequest {
            display_name: "On-call Engineer".to_string(),
            email: "oncall@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            role: Some(Role::Responder),
        }),
    )
    .await
    .unwrap();
    let principal = principal_for(responder.user.id, Role::Responder);

    let created = incidents_rest::create(
        State(state.clone()),
        principal.clone(),
        Json(CreateIncidentInput { title: "Elevated 5xx rate".to_string(), severity: Severity::High, description: None }),
    )
    .await
    .unwrap();

    let resolved = incidents_rest::update_status(
        State(state.clone()),
        principal.clone(),
        Path(created.incident.id),
        Json(incidents_rest::UpdateStatusRequest { status: Status::Resolved }),
    )
    .await
    .unwrap();
    assert!(resolved.incident.resolved_at.is_some());

    // Resolved can only reopen into Investigating, never skip straight to Identified.
    let rejected = incidents_rest::update_status(
        State(state.clone()),
        principal.clone(),
        Path(created.incident.id),
        Json(incidents_rest::UpdateStatusRequest { status: Status::Identified }),
    )
    .await;
    assert!(rejected.is_err());

    let reopened = incidents_rest::update_status(
        State(state.clone()),
        principal,
        Path(created.incident.id),
        Json(incidents_rest::UpdateStatusRequest { status: Status::Investigating }),
    )
    .await
    .unwrap();
    assert_eq!(reopened.incident.resolved_at, resolved.incident.resolved_at);
}

#[tokio::test]
async fn only_admins_can_change_another_users_role() {
    let state = test_state().await;

    let admin = auth_rest::register(
        State(state.clone()),
        Json(auth_rest::RegisterRequest {
            display_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            role: Some(Role::Admin),
        }),
    )
    .await
    .unwrap();
    let viewer = auth_rest::register(
        State(state.clone()),
        Json(auth_rest::RegisterRequest {
            display_name: "Viewer".to_string(),
            email: "viewer@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            role: Some(Role::Viewer),
        }),
    )
    .await
    .unwrap();

    let admin_principal = principal_for(admin.user.id, Role::Admin);
    let promoted = users_rest::set_role(
        State(state.clone()),
        admin_principal,
        Path(viewer.user.id),
        Json(users_rest::SetRoleRequest { role: Role::Responder }),
    )
    .await
    .unwrap();
    assert_eq!(promoted.user.role, Role::Responder);

    let viewer_principal = principal_for(viewer.user.id, Role::Responder);
    let forbidden = users_rest::set_role(
        State(state),
        viewer_principal,
        Path(admin.user.id),
        Json(users_rest::SetRoleRequest { role: Role::Viewer }),
    )
    .await;
    assert!(forbidden.is_err());
}
