use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .access_admin_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccessItemRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .access_admin_service
        .create_role(payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .access_admin_service
        .find_role(RoleId::new(role_id))
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .delete_role(RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_admin_service
        .role_permissions(RoleId::new(role_id))
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn attach_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .attach_permissions(
            RoleId::new(role_id),
            &payload.references()?,
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}

pub async fn detach_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .detach_permissions(
            RoleId::new(role_id),
            &payload.references()?,
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}

pub async fn sync_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .sync_permissions(
            RoleId::new(role_id),
            &payload.references()?,
            payload.detaching(),
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}
