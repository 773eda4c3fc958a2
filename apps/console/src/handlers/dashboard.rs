use super::*;

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> ApiResult<Json<DashboardResponse>> {
    let view = state.dashboard_service.dashboard(&session).await?;

    Ok(Json(DashboardResponse::from(view)))
}
