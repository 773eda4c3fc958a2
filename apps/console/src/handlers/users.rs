use super::*;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<UserPageResponse>> {
    let defaults = UserListQuery::default();
    let query = UserListQuery::new(
        params.page.unwrap_or(defaults.page),
        params.limit.unwrap_or(defaults.limit),
        params.search,
    )?;

    let page = state
        .user_admin_service
        .list_users(&session, &query)
        .await?;

    Ok(Json(UserPageResponse::from(page)))
}

pub async fn toggle_user_active_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ToggleUserResponse>> {
    let user = state
        .user_admin_service
        .toggle_active(&session, user_id.as_str())
        .await?;

    let message = if user.is_active {
        "User activated successfully!"
    } else {
        "User deactivated successfully!"
    };

    Ok(Json(ToggleUserResponse {
        message: message.to_owned(),
        user: UserResponse::from(user),
    }))
}
