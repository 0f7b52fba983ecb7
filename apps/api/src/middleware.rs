use axum::extract::{Extension, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;
use tracing::debug;
use warden_core::{AppError, PrincipalIdentity};
use warden_domain::AccessGuard;

use crate::access_context::AccessContext;
use crate::auth::SESSION_PRINCIPAL_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session caller into an [`AccessContext`] for every request.
pub async fn attach_access_context(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<PrincipalIdentity>(SESSION_PRINCIPAL_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    request
        .extensions_mut()
        .insert(AccessContext::new(identity));
    Ok(next.run(request).await)
}

pub async fn require_auth(
    Extension(context): Extension<AccessContext>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = context
        .identity()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Lets the request through only when the caller passes the route's guard.
pub async fn verify_access(
    State(state): State<AppState>,
    Extension(guard): Extension<AccessGuard>,
    Extension(context): Extension<AccessContext>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !state
        .access_service
        .passes_guard(context.subject(), &guard)
        .await
    {
        debug!(
            path = %request.uri().path(),
            kind = guard.kind().as_str(),
            access = guard.access(),
            "route guard denied request"
        );
        return Err(AppError::Forbidden("access denied".to_owned()).into());
    }

    Ok(next.run(request).await)
}
