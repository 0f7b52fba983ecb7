use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tower_sessions::Session;
use tracing::info;
use warden_core::{AppError, PrincipalIdentity};

use crate::dto::{BootstrapRequest, PrincipalIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_PRINCIPAL_KEY: &str = "principal_identity";

/// Signs a principal in with the shared bootstrap token, registering it on first use.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let name = payload.principal.trim();
    let principal = match state
        .access_admin_service
        .find_principal_by_name(name)
        .await?
    {
        Some(principal) => principal,
        None => {
            state
                .access_admin_service
                .register_principal(name)
                .await?
        }
    };
    let identity = PrincipalIdentity::new(principal.id(), principal.name());

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_PRINCIPAL_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    info!(principal_id = principal.id().as_i64(), "bootstrap login");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<PrincipalIdentity>,
) -> ApiResult<Json<PrincipalIdentityResponse>> {
    let roles = state
        .access_admin_service
        .principal_roles(identity.principal_id())
        .await?
        .into_iter()
        .map(|assignment| assignment.role.name().as_str().to_owned())
        .collect();
    let permissions = state
        .access_admin_service
        .principal_permissions(identity.principal_id())
        .await?
        .into_iter()
        .map(|permission| permission.name().as_str().to_owned())
        .collect();

    Ok(Json(PrincipalIdentityResponse::from_identity(
        &identity,
        roles,
        permissions,
    )))
}
