// [libs/domain/src/principal.rs]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A principal's role. Ordering below is intentionally not `Ord`-derived —
/// the authorization table in `warroom_server::services::authorization` is
/// the single place role comparisons happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Responder,
    Viewer,
}

impl Role {
    /// Admin and responder can mutate incident state; viewers cannot.
    pub fn is_writer(self) -> bool {
        matches!(self, Role::Admin | Role::Responder)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Responder => "responder",
            Role::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "responder" => Ok(Role::Responder),
            "viewer" => Ok(Role::Viewer),
            _ => Err(()),
        }
    }
}

/// The credential-free principal carried through the system after
/// authentication. The password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}
