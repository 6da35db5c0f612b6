// [libs/domain/src/lib.rs]
//! Shared domain model for the incident collaboration core: principals,
//! incidents, the append-only update log, presence/focus records, and the
//! typed command/event envelopes that cross the WebSocket wire.

pub mod commands;
pub mod error;
pub mod events;
pub mod focus;
pub mod incident;
pub mod presence;
pub mod principal;
pub mod update;

pub mod prelude {
    pub use crate::commands::{InboundCommand, InboundEnvelope};
    pub use crate::error::DomainError;
    pub use crate::events::{OutboundEvent, OutboundEnvelope};
    pub use crate::focus::{FocusEntry, FocusSection};
    pub use crate::incident::{Incident, Severity, Status};
    pub use crate::presence::PresenceEntry;
    pub use crate::principal::{Principal, Role};
    pub use crate::update::{Update, UpdateContent};
}
