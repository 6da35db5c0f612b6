// [libs/domain/src/presence.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One principal's subscription to one incident room. Uniquely keyed by
/// (principal_id, incident_id); a later join under a different session id
/// replaces the prior entry rather than coexisting with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub principal_id: Uuid,
    pub incident_id: Uuid,
    pub session_id: Uuid,
    pub last_active_at: DateTime<Utc>,
    pub display_name: String,
}
