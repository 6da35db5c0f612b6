// [libs/store/src/models.rs]
use chrono::{DateTime, Utc};
use uuid::Uuid;
use warroom_domain::principal::Role;

/// The persisted credential/identity record behind a `Principal`. Never
/// serialized to the wire directly — handlers project it down to
/// `Principal` before it reaches a client.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
