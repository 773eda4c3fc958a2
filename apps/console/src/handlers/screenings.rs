use super::*;

pub async fn list_sessions_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Query(params): Query<SessionListParams>,
) -> ApiResult<Json<Vec<ScreeningSessionResponse>>> {
    let defaults = SessionListQuery::default();
    let status = params
        .status
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::parse::<ScreeningStatus>)
        .transpose()?;
    let query = SessionListQuery::new(
        params.page.unwrap_or(defaults.page),
        params.limit.unwrap_or(defaults.limit),
        status,
    )?;

    let sessions = state
        .screening_service
        .list_sessions(&session, &query)
        .await?
        .into_iter()
        .map(ScreeningSessionResponse::from)
        .collect();

    Ok(Json(sessions))
}

pub async fn update_session_status_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(session_id): Path<String>,
    Json(payload): Json<UpdateSessionStatusRequest>,
) -> ApiResult<Json<ScreeningSessionResponse>> {
    let next = payload.status.parse::<ScreeningStatus>()?;
    let updated = state
        .screening_service
        .update_session_status(&session, session_id.as_str(), next)
        .await?;

    Ok(Json(ScreeningSessionResponse::from(updated)))
}

pub async fn start_wizard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Json(payload): Json<StartWizardRequest>,
) -> ApiResult<(StatusCode, Json<WizardResponse>)> {
    let screening_type = ScreeningType::parse(payload.screening_type.as_str()).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown screening type '{}'",
            payload.screening_type
        ))
    })?;

    let handle = state
        .screening_service
        .start_wizard(&session, screening_type)
        .await?;

    Ok((StatusCode::CREATED, Json(WizardResponse::from(handle))))
}

pub async fn wizard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let handle = state
        .screening_service
        .wizard(&session, parse_wizard_id(wizard_id.as_str())?)
        .await?;

    Ok(Json(WizardResponse::from(handle)))
}

pub async fn update_wizard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
    Json(payload): Json<WizardFieldsDto>,
) -> ApiResult<Json<WizardResponse>> {
    let handle = state
        .screening_service
        .update_wizard(
            &session,
            parse_wizard_id(wizard_id.as_str())?,
            payload.into(),
        )
        .await?;

    Ok(Json(WizardResponse::from(handle)))
}

pub async fn next_wizard_step_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let handle = state
        .screening_service
        .next_step(&session, parse_wizard_id(wizard_id.as_str())?)
        .await?;

    Ok(Json(WizardResponse::from(handle)))
}

pub async fn previous_wizard_step_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
) -> ApiResult<Json<WizardResponse>> {
    let handle = state
        .screening_service
        .previous_step(&session, parse_wizard_id(wizard_id.as_str())?)
        .await?;

    Ok(Json(WizardResponse::from(handle)))
}

pub async fn complete_wizard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
) -> ApiResult<(StatusCode, Json<SubmittedScreeningResponse>)> {
    let created = state
        .screening_service
        .complete_wizard(&session, parse_wizard_id(wizard_id.as_str())?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmittedScreeningResponse {
            message: "Screening completed successfully!".to_owned(),
            session: ScreeningSessionResponse::from(created),
        }),
    ))
}

pub async fn discard_wizard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<ConsoleSession>,
    Path(wizard_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .screening_service
        .discard_wizard(&session, parse_wizard_id(wizard_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
