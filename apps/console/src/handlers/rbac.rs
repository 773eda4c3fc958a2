use super::*;

pub async fn rbac_snapshot_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> ApiResult<Json<RbacSnapshotResponse>> {
    let snapshot = state.rbac_admin_service.load_snapshot(&session).await?;

    Ok(Json(RbacSnapshotResponse::for_actor(
        snapshot,
        session.role(),
    )))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<(StatusCode, Json<RbacMutationResponse>)> {
    let outcome = state
        .rbac_admin_service
        .create_role(&session, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RbacMutationResponse::from_outcome(outcome, session.role())),
    ))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(role_id): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Json<RbacMutationResponse>> {
    let outcome = state
        .rbac_admin_service
        .update_role(&session, role_id.as_str(), payload.into())
        .await?;

    Ok(Json(RbacMutationResponse::from_outcome(
        outcome,
        session.role(),
    )))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RbacMutationResponse>> {
    let outcome = state
        .rbac_admin_service
        .delete_role(&session, role_id.as_str())
        .await?;

    Ok(Json(RbacMutationResponse::from_outcome(
        outcome,
        session.role(),
    )))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Json(payload): Json<AssignUserRoleRequest>,
) -> ApiResult<Json<RbacMutationResponse>> {
    let outcome = state
        .rbac_admin_service
        .assign_user_role(&session, payload.user_id.as_str(), payload.role_id.as_str())
        .await?;

    Ok(Json(RbacMutationResponse::from_outcome(
        outcome,
        session.role(),
    )))
}
