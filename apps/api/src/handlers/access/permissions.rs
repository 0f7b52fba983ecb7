use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_admin_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccessItemRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .access_admin_service
        .create_permission(payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<i64>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .access_admin_service
        .find_permission(PermissionId::new(permission_id))
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .delete_permission(PermissionId::new(permission_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
