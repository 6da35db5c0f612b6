// [apps/server/src/services/authorization.rs]
//! Pure (role, action) -> allow/deny table (spec §4.2). Kept free of I/O so
//! it can be unit tested exhaustively and reused identically by both the
//! REST handlers and the command dispatcher.

use warroom_domain::error::DomainError;
use warroom_domain::principal::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    IncidentCreate,
    IncidentUpdate,
    IncidentAssign,
    IncidentNote,
    IncidentActionItem,
    UserManage,
    Read,
}

impl Action {
    fn requires_admin(self) -> bool {
        matches!(self, Action::UserManage)
    }

    fn requires_writer(self) -> bool {
        matches!(
            self,
            Action::IncidentCreate
                | Action::IncidentUpdate
                | Action::IncidentAssign
                | Action::IncidentNote
                | Action::IncidentActionItem
        )
    }
}

pub fn authorize(role: Role, action: Action) -> Result<(), DomainError> {
    if action.requires_admin() && !role.is_admin() {
        return Err(DomainError::Forbidden("action requires the admin role"));
    }
    if action.requires_writer() && !role.is_writer() {
        return Err(DomainError::Forbidden("action requires a writer role"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewers_cannot_write() {
        for action in [
            Action::IncidentCreate,
            Action::IncidentUpdate,
            Action::IncidentAssign,
            Action::IncidentNote,
            Action::IncidentActionItem,
        ] {
            assert!(authorize(Role::Viewer, action).is_err());
        }
    }

    #[test]
    fn responders_can_write_but_not_manage_users() {
        assert!(authorize(Role::Responder, Action::IncidentUpdate).is_ok());
        assert!(authorize(Role::Responder, Action::UserManage).is_err());
    }

    #[test]
    fn admins_can_do_everything() {
        assert!(authorize(Role::Admin, Action::UserManage).is_ok());
        assert!(authorize(Role::Admin, Action::IncidentCreate).is_ok());
    }

    #[test]
    fn reads_require_no_specific_role() {
        for role in [Role::Admin, Role::Responder, Role::Viewer] {
            assert!(authorize(role, Action::Read).is_ok());
        }
    }
}
