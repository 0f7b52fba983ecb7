use super::*;

pub async fn register_principal_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrincipalRequest>,
) -> ApiResult<(StatusCode, Json<PrincipalResponse>)> {
    let principal = state
        .access_admin_service
        .register_principal(payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(PrincipalResponse::from(principal))))
}

pub async fn get_principal_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
) -> ApiResult<Json<PrincipalResponse>> {
    let principal = state
        .access_admin_service
        .find_principal(PrincipalId::new(principal_id))
        .await?;

    Ok(Json(PrincipalResponse::from(principal)))
}

pub async fn delete_principal_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .delete_principal(PrincipalId::new(principal_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_principal_roles_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let roles = state
        .access_admin_service
        .principal_roles(PrincipalId::new(principal_id))
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn list_principal_permissions_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_admin_service
        .principal_permissions(PrincipalId::new(principal_id))
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn attach_principal_roles_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .attach_roles(
            PrincipalId::new(principal_id),
            &payload.references()?,
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}

pub async fn detach_principal_roles_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .detach_roles(
            PrincipalId::new(principal_id),
            &payload.references()?,
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}

pub async fn sync_principal_roles_handler(
    State(state): State<AppState>,
    Path(principal_id): Path<i64>,
    Json(payload): Json<AssociationRequest>,
) -> ApiResult<Json<AssociationChangesResponse>> {
    let changes = state
        .access_admin_service
        .sync_roles(
            PrincipalId::new(principal_id),
            &payload.references()?,
            payload.detaching(),
            payload.column()?,
        )
        .await?;

    Ok(Json(AssociationChangesResponse::from(changes)))
}
