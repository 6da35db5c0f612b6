// [apps/server/src/services/status_machine.rs]
//! Pure status transition table (spec §4.3). Shared by the WebSocket
//! command handler and the REST `PATCH /incidents/:id/status` handler so
//! there is exactly one place that decides which transitions are legal.

use warroom_domain::error::DomainError;
use warroom_domain::incident::Status;

pub fn validate_transition(from: Status, to: Status) -> Result<(), DomainError> {
    if from == to {
        return Err(DomainError::Conflict("incident is already in that status"));
    }

    let allowed: &[Status] = match from {
        Status::Investigating => &[Status::Identified, Status::Monitoring, Status::Resolved],
        Status::Identified => &[Status::Investigating, Status::Monitoring, Status::Resolved],
        Status::Monitoring => &[Status::Investigating, Status::Identified, Status::Resolved],
        Status::Resolved => &[Status::Investigating],
    };

    if allowed.contains(&to) {
        Ok(())
    } else {
        Err(DomainError::Conflict("illegal status transition"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_same_state_transition() {
        assert!(validate_transition(Status::Investigating, Status::Investigating).is_err());
    }

    #[test]
    fn resolved_can_only_reopen_to_investigating() {
        assert!(validate_transition(Status::Resolved, Status::Investigating).is_ok());
        assert!(validate_transition(Status::Resolved, Status::Identified).is_err());
        assert!(validate_transition(Status::Resolved, Status::Monitoring).is_err());
    }

    #[test]
    fn every_non_resolved_state_can_reach_resolved() {
        for from in [Status::Investigating, Status::Identified, Status::Monitoring] {
            assert!(validate_transition(from, Status::Resolved).is_ok());
        }
    }
}
