// [libs/domain/src/focus.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusSection {
    Status,
    Severity,
    Description,
    Notes,
    Assignees,
    ActionItems,
    Commander,
}

/// Ephemeral cursor state. One entry per principal, globally — a principal
/// editing incident A cannot simultaneously hold a focus entry on incident
/// B, matching the single-cursor mental model of the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusEntry {
    pub principal_id: Uuid,
    pub incident_id: Uuid,
    pub section: FocusSection,
    pub field_id: Option<String>,
    pub color: &'static str,
    pub last_update: DateTime<Utc>,
}
