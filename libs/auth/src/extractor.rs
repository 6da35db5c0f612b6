// [libs/auth/src/extractor.rs]
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use warroom_domain::principal::Role;

use crate::claims::SessionClaims;
use crate::error::AuthError;
use crate::verifier::SessionVerifier;

/// A request-scoped, verified principal. Handlers take this as an extractor
/// argument instead of re-parsing the bearer token themselves.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub claims: SessionClaims,
}

impl AuthenticatedPrincipal {
    pub fn id(&self) -> uuid::Uuid {
        self.claims.sub
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    Arc<SessionVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<SessionVerifier>::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredential)?;

        let token = parse_bearer(header_value)?;
        let claims = verifier.verify(&token)?;

        Ok(Self { claims })
    }
}

fn parse_bearer(value: &HeaderValue) -> Result<String, AuthError> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::Malformed("authorization header is not valid UTF-8".into()))?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Malformed("authorization header is not a bearer token".into()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Malformed("bearer token is empty".into()));
    }

    Ok(token.to_owned())
}
