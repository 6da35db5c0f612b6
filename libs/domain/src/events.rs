// [libs/domain/src/events.rs]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::focus::FocusEntry;
use crate::incident::Incident;
use crate::presence::PresenceEntry;
use crate::update::Update;

pub type OutboundEnvelope = OutboundEvent;

/// The outbound WebSocket envelope: `{ "event": "...", "data": { ... } }`.
/// Every state-affecting broadcast carries the full updated incident
/// projection alongside the audit record that caused it, so a client never
/// has to reconstruct derived state from a diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    #[serde(rename = "presence:list")]
    PresenceList {
        incident_id: Uuid,
        entries: Vec<PresenceEntry>,
    },

    #[serde(rename = "presence:joined")]
    PresenceJoined {
        incident_id: Uuid,
        entry: PresenceEntry,
    },

    #[serde(rename = "presence:left")]
    PresenceLeft {
        incident_id: Uuid,
        principal_id: Uuid,
    },

    #[serde(rename = "focus:list")]
    FocusList {
        incident_id: Uuid,
        entries: Vec<FocusEntry>,
    },

    #[serde(rename = "focus:updated")]
    FocusUpdated { entry: FocusEntry },

    #[serde(rename = "focus:cleared")]
    FocusCleared {
        incident_id: Uuid,
        principal_id: Uuid,
    },

    #[serde(rename = "incident:updated")]
    IncidentUpdated { incident: Incident, update: Update },

    #[serde(rename = "incident:noteAdded")]
    IncidentNoteAdded { incident: Incident, update: Update },

    #[serde(rename = "incident:assigned")]
    IncidentAssigned { incident: Incident, update: Update },

    #[serde(rename = "incident:actionItemAdded")]
    IncidentActionItemAdded { incident: Incident, update: Update },

    #[serde(rename = "incident:actionItemToggled")]
    IncidentActionItemToggled { incident: Incident, update: Update },

    #[serde(rename = "error")]
    Error { message: String, code: &'static str },
}
