// [apps/server/src/services/command_dispatcher.rs]
//! Routes one inbound command through the fixed pipeline: authorize ->
//! validate -> invoke -> construct update -> broadcast (spec §4.8). Every
//! error is turned into an `error` event for the originating session only
//! — a bad command from one client never affects another.

use tracing::{instrument, warn};
use uuid::Uuid;
use warroom_domain::commands::InboundCommand;
use warroom_domain::error::DomainError;
use warroom_domain::events::OutboundEvent;
use warroom_domain::principal::Principal;
use warroom_domain::update::AssignmentAction;

use crate::error::to_ws_event;
use crate::services::authorization::{authorize, Action};
use crate::services::status_machine::validate_transition;
use crate::state::AppState;

/// Dispatches one command for `principal` over `session_id`. Never
/// returns an error to the caller — failures are reported to the
/// originating session as an `error` event and otherwise swallowed, per
/// the "malformed command from one client cannot affect others" guarantee.
#[instrument(skip(state, command), fields(session_id = %session_id))]
pub async fn dispatch(state: &AppState, principal: &Principal, session_id: Uuid, command: InboundCommand) {
    if let Err(error) = dispatch_inner(state, principal, session_id, command).await {
        warn!(%session_id, error = %error, "command rejected");
        state.room_hub.send_to(session_id, to_ws_event(&error));
    }
}

async fn dispatch_inner(
    state: &AppState,
    principal: &Principal,
    session_id: Uuid,
    command: InboundCommand,
) -> Result<(), DomainError> {
    match command {
        InboundCommand::IncidentJoin(incident_id) => handle_join(state, principal, session_id, incident_id).await,
        InboundCommand::IncidentLeave { incident_id } => handle_leave(state, principal, session_id, incident_id).await,
        InboundCommand::PresenceHeartbeat => handle_heartbeat(state, principal, session_id).await,
        InboundCommand::FocusUpdate { incident_id, section, field_id } => {
            handle_focus_update(state, principal, session_id, incident_id, section, field_id)
        }
        InboundCommand::FocusClear { incident_id } => handle_focus_clear(state, principal, incident_id),
        InboundCommand::IncidentUpdateStatus { incident_id, status } => {
            handle_update_status(state, principal, incident_id, status).await
        }
        InboundCommand::IncidentAddNote { incident_id, text } => {
            handle_add_note(state, principal, incident_id, text).await
        }
        InboundCommand::IncidentAssign { incident_id, target_user_id } => {
            handle_assignment(state, principal, incident_id, target_user_id, AssignmentAction::Assigned).await
        }
        InboundCommand::IncidentUnassign { incident_id, target_user_id } => {
            handle_assignment(state, principal, incident_id, target_user_id, AssignmentAction::Unassigned).await
        }
        InboundCommand::IncidentAddActionItem { incident_id, text } => {
            handle_add_action_item(state, principal, incident_id, text).await
        }
        InboundCommand::IncidentToggleActionItem { incident_id, update_id, completed } => {
            handle_toggle_action_item(state, principal, incident_id, update_id, completed).await
        }
    }
}

async fn handle_join(
    state: &AppState,
    principal: &Principal,
    session_id: Uuid,
    incident_id: Uuid,
) -> Result<(), DomainError> {
    // Confirms the incident exists before subscribing the session to it.
    state.incidents.get(incident_id).await?;

    state.room_hub.subscribe(incident_id, session_id);
    let entry = state
        .presence
        .join(incident_id, principal.id, session_id, &principal.display_name)
        .await?;

    state.room_hub.broadcast(
        incident_id,
        OutboundEvent::PresenceJoined { incident_id, entry },
        Some(session_id),
    );
    state.room_hub.send_to(
        session_id,
        OutboundEvent::PresenceList {
            incident_id,
            entries: state.presence.list(incident_id),
        },
    );
    state.room_hub.send_to(
        session_id,
        OutboundEvent::FocusList {
            incident_id,
            entries: state.focus.list_for_incident(incident_id),
        },
    );
    Ok(())
}

async fn handle_leave(
    state: &AppState,
    principal: &Principal,
    session_id: Uuid,
    incident_id: Uuid,
) -> Result<(), DomainError> {
    state.room_hub.unsubscribe(incident_id, session_id);
    state.presence.leave(incident_id, principal.id).await?;
    if let Some(entry) = state.focus.clear_for_incident(principal.id, incident_id) {
        state.room_hub.broadcast(
            entry.incident_id,
            OutboundEvent::FocusCleared { incident_id: entry.incident_id, principal_id: principal.id },
            Some(session_id),
        );
    }
    state.room_hub.broadcast(
        incident_id,
        OutboundEvent::PresenceLeft { incident_id, principal_id: principal.id },
        Some(session_id),
    );
    Ok(())
}

async fn handle_heartbeat(state: &AppState, principal: &Principal, _session_id: Uuid) -> Result<(), DomainError> {
    for incident_id in state.presence.session_incident_ids(principal.id) {
        state.presence.heartbeat(incident_id, principal.id).await?;
    }
    Ok(())
}

fn handle_focus_update(
    state: &AppState,
    principal: &Principal,
    session_id: Uuid,
    incident_id: Uuid,
    section: warroom_domain::focus::FocusSection,
    field_id: Option<String>,
) -> Result<(), DomainError> {
    if let Some(entry) = state.focus.update(principal.id, incident_id, session_id, section, field_id) {
        state.room_hub.broadcast(incident_id, OutboundEvent::FocusUpdated { entry }, Some(session_id));
    }
    Ok(())
}

fn handle_focus_clear(state: &AppState, principal: &Principal, incident_id: Uuid) -> Result<(), DomainError> {
    if state.focus.clear(principal.id).is_some() {
        state.room_hub.broadcast(
            incident_id,
            OutboundEvent::FocusCleared { incident_id, principal_id: principal.id },
            None,
        );
    }
    Ok(())
}

async fn handle_update_status(
    state: &AppState,
    principal: &Principal,
    incident_id: Uuid,
    status: warroom_domain::incident::Status,
) -> Result<(), DomainError> {
    authorize(principal.role, Action::IncidentUpdate)?;
    let current = state.incidents.get(incident_id).await?;
    validate_transition(current.status, status)?;

    let (incident, update) = state.incidents.update_status(incident_id, principal.id, status).await?;
    state
        .room_hub
        .broadcast(incident_id, OutboundEvent::IncidentUpdated { incident, update }, None);
    Ok(())
}

async fn handle_add_note(
    state: &AppState,
    principal: &Principal,
    incident_id: Uuid,
    text: String,
) -> Result<(), DomainError> {
    authorize(principal.role, Action::IncidentNote)?;
    let text = text.trim();
    if text.is_empty() || text.chars().count() > 2000 {
        return Err(DomainError::Validation("note text must be 1..2000 characters".into()));
    }

    let (incident, update) = state.incidents.add_note(incident_id, principal.id, text).await?;
    state
        .room_hub
        .broadcast(incident_id, OutboundEvent::IncidentNoteAdded { incident, update }, None);
    Ok(())
}

async fn handle_assignment(
    state: &AppState,
    principal: &Principal,
    incident_id: Uuid,
    target_user_id: Uuid,
    action: AssignmentAction,
) -> Result<(), DomainError> {
    authorize(principal.role, Action::IncidentAssign)?;
    let current = state.incidents.get(incident_id).await?;

    let (incident, update) = match action {
        AssignmentAction::Assigned => {
            if current.has_assignee(target_user_id) {
                return Err(DomainError::Conflict("user is already assigned"));
            }
            state.incidents.assign(incident_id, principal.id, target_user_id).await?
        }
        AssignmentAction::Unassigned => {
            if !current.has_assignee(target_user_id) {
                return Err(DomainError::Conflict("user is not assigned"));
            }
            state.incidents.unassign(incident_id, principal.id, target_user_id).await?
        }
    };

    state
        .room_hub
        .broadcast(incident_id, OutboundEvent::IncidentAssigned { incident, update }, None);
    Ok(())
}

async fn handle_add_action_item(
    state: &AppState,
    principal: &Principal,
    incident_id: Uuid,
    text: String,
) -> Result<(), DomainError> {
    authorize(principal.role, Action::IncidentActionItem)?;
    let text = text.trim();
    if text.is_empty() || text.chars().count() > 2000 {
        return Err(DomainError::Validation("action item text must be 1..2000 characters".into()));
    }

    let (incident, update) = state.incidents.add_action_item(incident_id, principal.id, text).await?;
    state.room_hub.broadcast(
        incident_id,
        OutboundEvent::IncidentActionItemAdded { incident, update },
        None,
    );
    Ok(())
}

async fn handle_toggle_action_item(
    state: &AppState,
    principal: &Principal,
    incident_id: Uuid,
    update_id: Uuid,
    completed: bool,
) -> Result<(), DomainError> {
    authorize(principal.role, Action::IncidentActionItem)?;
    let (incident, update) = state.incidents.toggle_action_item(incident_id, update_id, completed).await?;
    state.room_hub.broadcast(
        incident_id,
        OutboundEvent::IncidentActionItemToggled { incident, update },
        None,
    );
    Ok(())
}
