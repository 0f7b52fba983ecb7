use super::*;

pub async fn check_roles_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let granted = match AccessCheckSpec::from_json(&payload.spec) {
        Ok(spec) => {
            state
                .access_service
                .has_roles_spec(context.subject(), &spec)
                .await
        }
        Err(error) => {
            debug!(%error, "unreadable role check denied");
            false
        }
    };

    Ok(Json(AccessCheckResponse { granted }))
}

pub async fn check_permissions_handler(
    State(state): State<AppState>,
    Extension(context): Extension<AccessContext>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let granted = match AccessCheckSpec::from_json(&payload.spec) {
        Ok(spec) => {
            state
                .access_service
                .has_permissions_spec(context.subject(), &spec)
                .await
        }
        Err(error) => {
            debug!(%error, "unreadable permission check denied");
            false
        }
    };

    Ok(Json(AccessCheckResponse { granted }))
}
