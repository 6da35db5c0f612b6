// [apps/server/src/error.rs]
//! The single terminal error mapper (spec §2 item 13, §7): every
//! `DomainError` that reaches the transport boundary goes through exactly
//! one of the two functions below — `IntoResponse` for REST, `to_ws_event`
//! for the streaming session.

use axum::response::{IntoResponse, Response};
use warroom_auth::render_domain_error;
use warroom_domain::error::DomainError;
use warroom_domain::events::OutboundEvent;

#[derive(Debug)]
pub struct AppError(pub DomainError);

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        Self(value)
    }
}

impl From<warroom_auth::AuthError> for AppError {
    fn from(value: warroom_auth::AuthError) -> Self {
        Self(DomainError::from(value))
    }
}

impl From<warroom_store::StoreError> for AppError {
    fn from(value: warroom_store::StoreError) -> Self {
        Self(DomainError::from(value))
    }
}

/// Production builds redact internal error messages; every other kind is
/// already safe to show verbatim (it describes the caller's own request).
/// Mirrors the redaction `render_domain_error` applies, kept here too since
/// `to_ws_event` needs the message alone, not a full HTTP response.
fn message_for(error: &DomainError) -> String {
    if matches!(error, DomainError::Internal(_)) && !cfg!(debug_assertions) {
        "internal error".to_string()
    } else {
        error.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        render_domain_error(&self.0)
    }
}

/// Builds the `{"event":"error","data":{...}}` envelope sent to the
/// originating session only (spec §6, §7). Never closes the socket.
pub fn to_ws_event(error: &DomainError) -> OutboundEvent {
    OutboundEvent::Error {
        message: message_for(error),
        code: error.code(),
    }
}
