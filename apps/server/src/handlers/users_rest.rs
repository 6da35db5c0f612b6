// [apps/server/src/handlers/users_rest.rs]
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warroom_auth::AuthenticatedPrincipal;
use warroom_domain::principal::{Principal, Role};

use crate::error::AppError;
use crate::services::authorization::{authorize, Action};
use crate::state::AppState;

fn to_principal(account: &warroom_store::Account) -> Principal {
    Principal {
        id: account.id,
        display_name: account.display_name.clone(),
        email: account.email.clone(),
        role: account.role,
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersFilters {
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<Principal>,
}

pub async fn list(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Query(filters): Query<ListUsersFilters>,
) -> Result<Json<UsersResponse>, AppError> {
    authorize(principal.role(), Action::UserManage)?;

    let mut users: Vec<Principal> = state.users.list().await?.iter().map(to_principal).collect();
    if let Some(role) = filters.role {
        users.retain(|user| user.role == role);
    }
    Ok(Json(UsersResponse { users }))
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Principal,
}

pub async fn get(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    authorize(principal.role(), Action::UserManage)?;
    let account = state.users.find_by_id(user_id).await?;
    Ok(Json(UserResponse { user: to_principal(&account) }))
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

pub async fn set_role(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    authorize(principal.role(), Action::UserManage)?;
    let account = state.users.set_role(user_id, request.role).await?;
    Ok(Json(UserResponse { user: to_principal(&account) }))
}
