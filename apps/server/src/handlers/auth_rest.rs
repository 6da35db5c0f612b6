// [apps/server/src/handlers/auth_rest.rs]
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use warroom_auth::{hash_password, verify_password};
use warroom_domain::error::DomainError;
use warroom_domain::principal::{Principal, Role};
use warroom_store::Account;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Principal,
    pub token: String,
}

fn to_principal(account: &Account) -> Principal {
    Principal {
        id: account.id,
        display_name: account.display_name.clone(),
        email: account.email.clone(),
        role: account.role,
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if request.display_name.trim().is_empty() {
        return Err(DomainError::Validation("display_name must not be empty".into()).into());
    }
    if request.password.len() < 8 {
        return Err(DomainError::Validation("password must be at least 8 characters".into()).into());
    }

    let password_hash = hash_password(&request.password)?;
    let role = request.role.unwrap_or(Role::Viewer);

    let account = state
        .users
        .create(&request.display_name, &request.email, &password_hash, role)
        .await?;

    let token = state.verifier.issue(account.id, account.role)?;
    Ok(Json(AuthResponse {
        user: to_principal(&account),
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let account = state
        .users
        .find_by_email(&request.email)
        .await
        .map_err(|_| AppError(DomainError::AuthInvalid))?;

    let matches = verify_password(&request.password, &account.password_hash)?;
    if !matches {
        return Err(AppError(DomainError::AuthInvalid));
    }

    let token = state.verifier.issue(account.id, account.role)?;
    Ok(Json(AuthResponse {
        user: to_principal(&account),
        token,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
}

pub async fn me(
    State(state): State<AppState>,
    principal: warroom_auth::AuthenticatedPrincipal,
) -> Result<Json<MeResponse>, AppError> {
    let account = state.users.find_by_id(principal.id()).await?;
    Ok(Json(MeResponse { user: to_principal(&account) }))
}
