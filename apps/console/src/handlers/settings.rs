use super::*;

pub async fn settings_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> ApiResult<Json<SettingsDto>> {
    let settings = state.settings_service.settings(&session).await?;

    Ok(Json(SettingsDto::from(settings)))
}

pub async fn update_settings_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Json(payload): Json<SettingsDto>,
) -> ApiResult<Json<SettingsUpdateResponse>> {
    let settings = state
        .settings_service
        .update_settings(&session, payload.into())
        .await?;

    Ok(Json(SettingsUpdateResponse {
        message: "Settings saved successfully!".to_owned(),
        settings: SettingsDto::from(settings),
    }))
}
