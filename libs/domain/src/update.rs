// [libs/domain/src/update.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::incident::Status;

/// An append-only audit record. Content is a tagged union rather than a bag
/// of optional fields so that, for example, reading `completed` off a note
/// or writing `new_status` on an action item is a compile error, not a bug
/// waiting to happen at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub content: UpdateContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentAction {
    Assigned,
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum UpdateContent {
    StatusChange {
        previous_status: Option<Status>,
        new_status: Status,
    },
    Assignment {
        action: AssignmentAction,
        target_user_id: Uuid,
    },
    Note {
        text: String,
    },
    ActionItem {
        text: String,
        completed: bool,
    },
}

impl UpdateContent {
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateContent::StatusChange { .. } => "status_change",
            UpdateContent::Assignment { .. } => "assignment",
            UpdateContent::Note { .. } => "note",
            UpdateContent::ActionItem { .. } => "action_item",
        }
    }
}
