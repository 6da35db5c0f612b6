// [libs/domain/src/commands.rs]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::incident::{Severity, Status};

/// The inbound WebSocket envelope: `{ "event": "...", "data": { ... } }`.
/// `InboundEnvelope` is what `serde_json` parses off the wire;
/// `InboundCommand` is the same shape with event and data already fused by
/// the tag/content representation below, so handlers match on a single enum
/// instead of re-dispatching on a string twice.
pub type InboundEnvelope = InboundCommand;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundCommand {
    #[serde(rename = "incident:join")]
    IncidentJoin(Uuid),

    #[serde(rename = "incident:leave")]
    IncidentLeave { incident_id: Uuid },

    #[serde(rename = "presence:heartbeat")]
    PresenceHeartbeat,

    #[serde(rename = "focus:update")]
    FocusUpdate {
        incident_id: Uuid,
        section: crate::focus::FocusSection,
        field_id: Option<String>,
    },

    #[serde(rename = "focus:clear")]
    FocusClear { incident_id: Uuid },

    #[serde(rename = "incident:updateStatus")]
    IncidentUpdateStatus { incident_id: Uuid, status: Status },

    #[serde(rename = "incident:addNote")]
    IncidentAddNote { incident_id: Uuid, text: String },

    #[serde(rename = "incident:assign")]
    IncidentAssign {
        incident_id: Uuid,
        target_user_id: Uuid,
    },

    #[serde(rename = "incident:unassign")]
    IncidentUnassign {
        incident_id: Uuid,
        target_user_id: Uuid,
    },

    #[serde(rename = "incident:addActionItem")]
    IncidentAddActionItem { incident_id: Uuid, text: String },

    #[serde(rename = "incident:toggleActionItem")]
    IncidentToggleActionItem {
        incident_id: Uuid,
        update_id: Uuid,
        completed: bool,
    },
}

/// Inputs accepted by `CreateIncident`, shared between the REST handler and
/// any future session-originated creation path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentInput {
    pub title: String,
    pub severity: Severity,
    pub description: Option<String>,
}
