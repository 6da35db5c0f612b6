// [libs/auth/src/error.rs]
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use warroom_domain::error::DomainError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingCredential,

    #[error("credential malformed: {0}")]
    Malformed(String),

    #[error("credential expired")]
    Expired,

    #[error("credential signature invalid: {0}")]
    Invalid(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
}

/// The single terminal HTTP error mapper (spec §7): every `DomainError`
/// reaching a REST boundary, whether produced inside a handler body or by
/// an extractor rejection before the handler ever runs, is rendered by
/// this one function. `apps/server::error::AppError` and this crate's own
/// `AuthError` rejection both delegate here so the wire shape never
/// diverges depending on which layer raised the error.
pub fn render_domain_error(error: &DomainError) -> Response {
    let status = match error {
        DomainError::AuthMissing | DomainError::AuthInvalid | DomainError::AuthExpired => {
            StatusCode::UNAUTHORIZED
        }
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if matches!(error, DomainError::Internal(_)) && !cfg!(debug_assertions) {
        "internal error".to_string()
    } else {
        error.to_string()
    };

    let body = ErrorBody { error: message, code: error.code() };
    (status, Json(body)).into_response()
}

/// Used only when `AuthenticatedPrincipal` surfaces directly as an axum
/// extractor rejection, i.e. before a handler body runs. Converts to the
/// same `DomainError` taxonomy every other HTTP error path uses and renders
/// through the same `render_domain_error` mapper.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        render_domain_error(&DomainError::from(self))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match value.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(value.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MissingCredential => DomainError::AuthMissing,
            AuthError::Malformed(_) => DomainError::AuthInvalid,
            AuthError::Expired => DomainError::AuthExpired,
            AuthError::Invalid(_) => DomainError::AuthInvalid,
            AuthError::Hashing(reason) => DomainError::Internal(reason),
        }
    }
}
