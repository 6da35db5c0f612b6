// [apps/server/src/handlers/incidents_rest.rs]
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warroom_auth::AuthenticatedPrincipal;
use warroom_domain::commands::CreateIncidentInput;
use warroom_domain::error::DomainError;
use warroom_domain::incident::{Incident, Severity, Status};
use warroom_domain::presence::PresenceEntry;
use warroom_domain::update::{AssignmentAction, Update};

use crate::error::AppError;
use crate::services::authorization::{authorize, Action};
use crate::services::status_machine::validate_transition;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListFilters {
    pub status: Option<Status>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Serialize)]
pub struct IncidentsResponse {
    pub incidents: Vec<Incident>,
}

pub async fn list(
    State(state): State<AppState>,
    _principal: AuthenticatedPrincipal,
    Query(filters): Query<ListFilters>,
) -> Result<Json<IncidentsResponse>, AppError> {
    let mut incidents = state.incidents.list().await?;
    if let Some(status) = filters.status {
        incidents.retain(|incident| incident.status == status);
    }
    if let Some(severity) = filters.severity {
        incidents.retain(|incident| incident.severity == severity);
    }
    Ok(Json(IncidentsResponse { incidents }))
}

#[derive(Debug, Serialize)]
pub struct IncidentResponse {
    pub incident: Incident,
}

pub async fn create(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(input): Json<CreateIncidentInput>,
) -> Result<Json<IncidentResponse>, AppError> {
    authorize(principal.role(), Action::IncidentCreate)?;

    if input.title.trim().is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()).into());
    }

    let incident = state
        .incidents
        .create(
            input.title.trim(),
            input.description.as_deref(),
            input.severity,
            principal.id(),
            principal.id(),
        )
        .await?;

    Ok(Json(IncidentResponse { incident }))
}

#[derive(Debug, Serialize)]
pub struct IncidentDetailResponse {
    pub incident: Incident,
    pub updates: Vec<Update>,
    pub presence: Vec<PresenceEntry>,
}

pub async fn get(
    State(state): State<AppState>,
    _principal: AuthenticatedPrincipal,
    Path(incident_id): Path<Uuid>,
) -> Result<Json<IncidentDetailResponse>, AppError> {
    let incident = state.incidents.get(incident_id).await?;
    let updates = state.incidents.list_updates(incident_id).await?;
    let presence = state.presence.list(incident_id);
    Ok(Json(IncidentDetailResponse { incident, updates, presence }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Status,
}

pub async fn update_status(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(incident_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<IncidentResponse>, AppError> {
    authorize(principal.role(), Action::IncidentUpdate)?;

    let current = state.incidents.get(incident_id).await?;
    validate_transition(current.status, request.status)?;

    let (incident, update) = state
        .incidents
        .update_status(incident_id, principal.id(), request.status)
        .await?;

    state.room_hub.broadcast(
        incident_id,
        warroom_domain::events::OutboundEvent::IncidentUpdated {
            incident: incident.clone(),
            update,
        },
        None,
    );

    Ok(Json(IncidentResponse { incident }))
}

#[derive(Debug, Deserialize)]
pub struct AssigneeRequest {
    pub target_user_id: Uuid,
    pub action: AssignmentAction,
}

pub async fn update_assignees(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(incident_id): Path<Uuid>,
    Json(request): Json<AssigneeRequest>,
) -> Result<Json<IncidentResponse>, AppError> {
    authorize(principal.role(), Action::IncidentAssign)?;

    let current = state.incidents.get(incident_id).await?;
    let (incident, update) = match request.action {
        AssignmentAction::Assigned => {
            if current.has_assignee(request.target_user_id) {
                return Err(DomainError::Conflict("user is already assigned").into());
            }
            state
                .incidents
                .assign(incident_id, principal.id(), request.target_user_id)
                .await?
        }
        AssignmentAction::Unassigned => {
            if !current.has_assignee(request.target_user_id) {
                return Err(DomainError::Conflict("user is not assigned").into());
            }
            state
                .incidents
                .unassign(incident_id, principal.id(), request.target_user_id)
                .await?
        }
    };

    state.room_hub.broadcast(
        incident_id,
        warroom_domain::events::OutboundEvent::IncidentAssigned {
            incident: incident.clone(),
            update,
        },
        None,
    );

    Ok(Json(IncidentResponse { incident }))
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub update: Update,
}

pub async fn add_note(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(incident_id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    authorize(principal.role(), Action::IncidentNote)?;

    let text = request.text.trim();
    if text.is_empty() || text.chars().count() > 2000 {
        return Err(DomainError::Validation("note text must be 1..2000 characters".into()).into());
    }

    let (incident, update) = state.incidents.add_note(incident_id, principal.id(), text).await?;

    state.room_hub.broadcast(
        incident_id,
        warroom_domain::events::OutboundEvent::IncidentNoteAdded {
            incident,
            update: update.clone(),
        },
        None,
    );

    Ok(Json(UpdateResponse { update }))
}
