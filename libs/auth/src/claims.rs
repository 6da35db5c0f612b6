// [libs/auth/src/claims.rs]
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warroom_domain::principal::Role;

/// Claims embedded in the HS256 session token. Kept intentionally small —
/// the token is a bearer credential for a principal id, not a cache of the
/// whole account record, so a role change takes effect on next login rather
/// than requiring a token revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
