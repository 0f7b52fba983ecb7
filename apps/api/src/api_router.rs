use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};
use warden_domain::AccessGuard;

use crate::handlers::access as access_handlers;
use crate::state::AppState;
use crate::{auth, handlers, middleware};


pub fn build_router<S>(app_state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let routes = api_routes(&app_state);
    with_request_layers(routes, app_state, session_layer)
}

/// Public, session and admin routes without the request-wide layers.
pub fn api_routes(app_state: &AppState) -> Router<AppState> {
    let admin_guard = app_state.admin_guard.clone();

    let admin_routes = Router::new()
        .route(
            "/api/roles",
            get(access_handlers::list_roles_handler).post(access_handlers::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(access_handlers::get_role_handler).delete(access_handlers::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(access_handlers::list_role_permissions_handler)
                .post(access_handlers::attach_role_permissions_handler)
                .delete(access_handlers::detach_role_permissions_handler)
                .put(access_handlers::sync_role_permissions_handler),
        )
        .route(
            "/api/permissions",
            get(access_handlers::list_permissions_handler)
                .post(access_handlers::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(access_handlers::get_permission_handler)
                .delete(access_handlers::delete_permission_handler),
        )
        .route(
            "/api/principals",
            post(access_handlers::register_principal_handler),
        )
        .route(
            "/api/principals/{principal_id}",
            get(access_handlers::get_principal_handler)
                .delete(access_handlers::delete_principal_handler),
        )
        .route(
            "/api/principals/{principal_id}/roles",
            get(access_handlers::list_principal_roles_handler)
                .post(access_handlers::attach_principal_roles_handler)
                .delete(access_handlers::detach_principal_roles_handler)
                .put(access_handlers::sync_principal_roles_handler),
        )
        .route(
            "/api/principals/{principal_id}/permissions",
            get(access_handlers::list_principal_permissions_handler),
        );

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route(
            "/api/access/roles/check",
            post(access_handlers::check_roles_handler),
        )
        .route(
            "/api/access/permissions/check",
            post(access_handlers::check_permissions_handler),
        )
        .merge(guard_routes(admin_routes, app_state, admin_guard))
        .merge(protected_routes)
}

/// Attaches the caller context, request tracing and the session layer.
pub fn with_request_layers<S>(
    routes: Router<AppState>,
    app_state: AppState,
    session_layer: SessionManagerLayer<S>,
) -> Router
where
    S: SessionStore + Clone,
{
    routes
        .layer(from_fn(middleware::attach_access_context))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(app_state)
}

/// Puts every route in `routes` behind an access guard answering 403 on failure.
pub fn guard_routes(
    routes: Router<AppState>,
    app_state: &AppState,
    guard: AccessGuard,
) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::verify_access,
        ))
        .layer(axum::Extension(guard))
}
