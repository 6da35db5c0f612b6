// [libs/domain/src/error.rs]
use thiserror::Error;

/// The error kinds named in the specification's error handling design
/// (§7) — not Rust types so much as a small closed taxonomy that every
/// layer (store, services, HTTP mapper, WebSocket mapper) agrees on. Each
/// variant knows its own machine-readable `code()`; the HTTP/WS boundary
/// layers own the status-code mapping so this crate stays transport-free.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("authentication credential missing")]
    AuthMissing,

    #[error("authentication credential invalid")]
    AuthInvalid,

    #[error("authentication credential expired")]
    AuthExpired,

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::AuthMissing => "AUTH_MISSING",
            DomainError::AuthInvalid => "AUTH_INVALID",
            DomainError::AuthExpired => "AUTH_EXPIRED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::Validation(_) => "VALIDATION",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::Internal(_) => "INTERNAL",
        }
    }
}
