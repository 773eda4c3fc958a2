use super::*;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> Json<ConsoleMeResponse> {
    let navigation = state.access_service.navigation(&session);
    let screening_types = state.access_service.screening_types(&session);

    Json(ConsoleMeResponse::new(&session, navigation, screening_types))
}

pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> Json<Vec<NavigationEntryResponse>> {
    Json(
        state
            .access_service
            .navigation(&session)
            .into_iter()
            .map(NavigationEntryResponse::from)
            .collect(),
    )
}

pub async fn forget_me_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
) -> StatusCode {
    state.access_service.close_session(&session).await;
    StatusCode::NO_CONTENT
}
