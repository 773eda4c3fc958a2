use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use url::Url;

use evep_application::{
    DashboardGateway, IdentityGateway, RbacGateway, ScreeningGateway, SettingsGateway,
    UserDirectoryGateway,
};
use evep_core::{AppError, BearerToken};
use evep_domain::{
    AdminSettings, RoleForm, ScreeningResults, ScreeningStatus, ScreeningSubmission,
    ScreeningType, SessionListQuery, UserListQuery,
};

use super::HttpPlatformClient;

#[derive(Debug, Clone)]
struct SeenRequest {
    method: String,
    path_and_query: String,
    authorization: Option<String>,
}

#[derive(Default)]
struct StubPlatform {
    routes: HashMap<(&'static str, &'static str), (u16, String)>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl StubPlatform {
    fn route(
        mut self,
        method: &'static str,
        path: &'static str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.routes.insert((method, path), (status, body.into()));
        self
    }
}

async fn respond(
    State(stub): State<Arc<StubPlatform>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    stub.seen.lock().await.push(SeenRequest {
        method: method.to_string(),
        path_and_query: uri
            .path_and_query()
            .map(ToString::to_string)
            .unwrap_or_default(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    });

    let found = stub
        .routes
        .iter()
        .find(|((route_method, route_path), _)| {
            *route_method == method.as_str() && *route_path == uri.path()
        })
        .map(|(_, response)| response.clone());

    match found {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve(stub: StubPlatform) -> (HttpPlatformClient, Arc<StubPlatform>) {
    let stub = Arc::new(stub);
    let app = Router::new().fallback(respond).with_state(stub.clone());

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("stub listener should bind");
    };
    let Ok(address) = listener.local_addr() else {
        panic!("stub listener should have an address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let Ok(base_url) = Url::parse(&format!("http://{address}/")) else {
        panic!("stub url should parse");
    };
    let Ok(client) = HttpPlatformClient::new(&base_url, Duration::from_secs(5)) else {
        panic!("client should build");
    };

    (client, stub)
}

fn token() -> BearerToken {
    BearerToken::new("stub-token").unwrap_or_else(|_| unreachable!())
}

const ROLE_JSON: &str = r#"{"id":"role-doctor","name":"Doctor","description":"Clinical staff","permissions":["patient.read"],"is_system":true}"#;

#[tokio::test]
async fn roles_are_read_from_named_envelope_or_bare_array() {
    let enveloped = format!(r#"{{"roles":[{ROLE_JSON}]}}"#);
    let bare = format!("[{ROLE_JSON}]");

    let (wrapped_client, _) =
        serve(StubPlatform::default().route("GET", "/api/v1/rbac/roles/", 200, enveloped)).await;
    let (bare_client, _) =
        serve(StubPlatform::default().route("GET", "/api/v1/rbac/roles/", 200, bare)).await;

    let wrapped = wrapped_client.list_roles(&token()).await;
    let plain = bare_client.list_roles(&token()).await;

    assert_eq!(wrapped.ok().map(|roles| roles.len()), Some(1));
    assert!(plain.is_ok_and(|roles| roles[0].is_system));
}

#[tokio::test]
async fn unexpected_shape_fails_loudly() {
    let (client, _) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/rbac/permissions/",
        200,
        r#"{"data":{"items":[]}}"#,
    ))
    .await;

    let result = client.list_permissions(&token()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn delete_role_sends_bearer_token_to_trailing_slash_path() {
    let (client, stub) = serve(StubPlatform::default().route(
        "DELETE",
        "/api/v1/rbac/roles/role-doctor/",
        204,
        "",
    ))
    .await;

    assert!(client.delete_role(&token(), "role-doctor").await.is_ok());

    let seen = stub.seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "DELETE");
    assert_eq!(seen[0].path_and_query, "/api/v1/rbac/roles/role-doctor/");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer stub-token"));
}

#[tokio::test]
async fn create_role_posts_draft() {
    let (client, stub) =
        serve(StubPlatform::default().route("POST", "/api/v1/rbac/roles/", 201, ROLE_JSON)).await;
    let Ok(draft) = RoleForm {
        name: "Doctor".to_owned(),
        ..RoleForm::default()
    }
    .into_draft() else {
        panic!("draft should validate");
    };

    let created = client.create_role(&token(), &draft).await;

    assert_eq!(created.ok().map(|role| role.id), Some("role-doctor".to_owned()));
    assert_eq!(stub.seen.lock().await[0].method, "POST");
}

#[tokio::test]
async fn upstream_statuses_map_to_error_categories() {
    let (client, _) = serve(
        StubPlatform::default()
            .route("GET", "/api/v1/dashboard/stats", 503, r#"{"detail":"db down"}"#)
            .route(
                "GET",
                "/api/v1/admin/settings",
                403,
                r#"{"detail":"Not enough permissions"}"#,
            )
            .route("GET", "/api/v1/auth/me", 401, ""),
    )
    .await;

    let stats = client.dashboard_stats(&token()).await;
    let settings = client.settings(&token()).await;
    let identity = client.current_identity(&token()).await;

    assert!(matches!(stats, Err(AppError::Unavailable(message)) if message.contains("db down")));
    assert!(matches!(settings, Err(AppError::Forbidden(message)) if message == "Not enough permissions"));
    assert!(matches!(identity, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn unreachable_platform_is_unavailable() {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("listener should bind");
    };
    let Ok(address) = listener.local_addr() else {
        panic!("listener should have an address");
    };
    drop(listener);
    let Ok(base_url) = Url::parse(&format!("http://{address}")) else {
        panic!("url should parse");
    };
    let Ok(client) = HttpPlatformClient::new(&base_url, Duration::from_secs(2)) else {
        panic!("client should build");
    };

    let result = client.list_roles(&token()).await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}

#[tokio::test]
async fn user_list_forwards_paging_and_accepts_bare_array() {
    let (client, stub) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/user-management/",
        200,
        r#"[{"id":"u-1","email":"nurse@evep.local","name":"Nurse Joy","role":"nurse","is_active":true}]"#,
    ))
    .await;
    let Ok(query) = UserListQuery::new(2, 10, Some("joy".to_owned())) else {
        panic!("valid query");
    };

    let page = client.list_users(&token(), &query).await;

    let Ok(page) = page else {
        panic!("page should decode");
    };
    assert_eq!(page.total, 1);
    assert_eq!(page.page, 2);
    assert_eq!(
        stub.seen.lock().await[0].path_and_query,
        "/api/v1/user-management/?page=2&limit=10&search=joy"
    );
}

#[tokio::test]
async fn current_identity_accepts_platform_field_names() {
    let (client, _) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/auth/me",
        200,
        r#"{"user_id":"u-9","email":"doc@evep.local","full_name":"Dr. Somsri","role":"doctor"}"#,
    ))
    .await;

    let identity = client.current_identity(&token()).await;

    assert!(identity.is_ok_and(|identity| identity.name() == "Dr. Somsri"));
}

const SESSION_JSON: &str = r#"{"id":"s-1","patient_id":"p-1","examiner_id":"u-3","screening_type":"mobile_unit","status":"in_progress"}"#;

const SETTINGS_JSON: &str = r#"{"system_name":"EVEP","session_timeout_minutes":45,"auto_refresh_seconds":0,"max_login_attempts":3,"maintenance_mode":true,"email_notifications":false}"#;

#[tokio::test]
async fn ids_with_slashes_stay_inside_their_collection() {
    let (client, stub) = serve(
        StubPlatform::default()
            .route("GET", "/api/v1/admin/settings", 200, SETTINGS_JSON)
            .route("PUT", "/api/v1/admin/settings", 200, SETTINGS_JSON),
    )
    .await;

    let found = client.find_user(&token(), "../admin/settings").await;
    let updated = client
        .update_user_status(&token(), "../../admin/settings", false)
        .await;
    let moved = client
        .update_session_status(&token(), "../../admin/settings", ScreeningStatus::Cancelled)
        .await;

    assert!(matches!(found, Err(AppError::NotFound(_))));
    assert!(matches!(updated, Err(AppError::NotFound(_))));
    assert!(matches!(moved, Err(AppError::NotFound(_))));
    let seen = stub.seen.lock().await;
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen[0].path_and_query,
        "/api/v1/user-management/..%2Fadmin%2Fsettings"
    );
    assert!(
        seen.iter()
            .all(|request| request.path_and_query != "/api/v1/admin/settings")
    );
}

#[tokio::test]
async fn dot_segment_ids_never_reach_the_platform() {
    let (client, stub) = serve(StubPlatform::default()).await;

    let parent = client.find_user(&token(), "..").await;
    let encoded = client.delete_role(&token(), "%2E%2e").await;
    let blank = client.find_session(&token(), " ").await;

    assert!(matches!(parent, Err(AppError::Validation(_))));
    assert!(matches!(encoded, Err(AppError::Validation(_))));
    assert!(matches!(blank, Err(AppError::Validation(_))));
    assert!(stub.seen.lock().await.is_empty());
}

#[tokio::test]
async fn session_list_forwards_status_filter() {
    let (client, stub) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/screenings/sessions",
        200,
        format!(r#"{{"sessions":[{SESSION_JSON}]}}"#),
    ))
    .await;
    let Ok(query) = SessionListQuery::new(3, 5, Some(ScreeningStatus::InProgress)) else {
        panic!("valid query");
    };

    let sessions = client.list_sessions(&token(), &query).await;

    let Ok(sessions) = sessions else {
        panic!("sessions should decode");
    };
    assert_eq!(sessions[0].screening_type, ScreeningType::MobileUnit);
    assert_eq!(
        stub.seen.lock().await[0].path_and_query,
        "/api/v1/screenings/sessions?page=3&limit=5&status=in_progress"
    );
}

#[tokio::test]
async fn session_reads_and_status_writes_use_session_path() {
    let (client, stub) = serve(
        StubPlatform::default()
            .route("GET", "/api/v1/screenings/sessions/s-1", 200, SESSION_JSON)
            .route(
                "PUT",
                "/api/v1/screenings/sessions/s-1",
                200,
                format!(r#"{{"session":{SESSION_JSON}}}"#),
            ),
    )
    .await;

    let found = client.find_session(&token(), "s-1").await;
    let updated = client
        .update_session_status(&token(), "s-1", ScreeningStatus::InProgress)
        .await;

    assert_eq!(
        found.ok().map(|session| session.status),
        Some(ScreeningStatus::InProgress)
    );
    assert!(updated.is_ok());
    let seen = stub.seen.lock().await;
    assert_eq!(seen[1].method, "PUT");
    assert_eq!(seen[1].path_and_query, "/api/v1/screenings/sessions/s-1");
}

#[tokio::test]
async fn wizard_submission_posts_to_sessions() {
    let (client, stub) = serve(StubPlatform::default().route(
        "POST",
        "/api/v1/screenings/sessions",
        201,
        SESSION_JSON,
    ))
    .await;
    let submission = ScreeningSubmission {
        patient_id: "p-1".to_owned(),
        examiner_id: "u-3".to_owned(),
        screening_type: ScreeningType::MobileUnit,
        location: Some("Mobile Unit 4".to_owned()),
        status: ScreeningStatus::Completed,
        results: ScreeningResults {
            left_eye_acuity: "6/6".to_owned(),
            right_eye_acuity: "6/9".to_owned(),
            ..ScreeningResults::default()
        },
    };

    let created = client.create_session(&token(), &submission).await;

    assert_eq!(created.ok().map(|session| session.id), Some("s-1".to_owned()));
    let seen = stub.seen.lock().await;
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path_and_query, "/api/v1/screenings/sessions");
}

#[tokio::test]
async fn settings_round_trip_through_envelope() {
    let (client, stub) = serve(
        StubPlatform::default()
            .route("GET", "/api/v1/admin/settings", 200, SETTINGS_JSON)
            .route(
                "PUT",
                "/api/v1/admin/settings",
                200,
                format!(r#"{{"settings":{SETTINGS_JSON}}}"#),
            ),
    )
    .await;

    let current = client.settings(&token()).await;
    let saved = client
        .update_settings(&token(), &AdminSettings::default())
        .await;

    assert!(current.is_ok_and(|settings| settings.maintenance_mode));
    assert_eq!(
        saved.ok().map(|settings| settings.session_timeout_minutes),
        Some(45)
    );
    assert_eq!(stub.seen.lock().await[1].method, "PUT");
}

#[tokio::test]
async fn dashboard_stats_decode_from_envelope() {
    let (client, _) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/dashboard/stats",
        200,
        r#"{"stats":{"total_patients":12,"total_screenings":20,"pending_screenings":4,"completed_screenings":15,"screenings_today":2,"active_users":7}}"#,
    ))
    .await;

    let stats = client.dashboard_stats(&token()).await;

    let Ok(stats) = stats else {
        panic!("stats should decode");
    };
    assert_eq!(stats.total_patients, 12);
    assert_eq!(stats.active_users, 7);
}

#[tokio::test]
async fn current_identity_accepts_mongo_style_id_inside_user_envelope() {
    let (client, stub) = serve(StubPlatform::default().route(
        "GET",
        "/api/v1/auth/me",
        200,
        r#"{"user":{"_id":"u-4","email":"nurse@evep.local","name":"Nurse Malee","role":"nurse"}}"#,
    ))
    .await;

    let identity = client.current_identity(&token()).await;

    let Ok(identity) = identity else {
        panic!("identity should decode");
    };
    assert_eq!(identity.user_id(), "u-4");
    assert_eq!(identity.role(), "nurse");
    assert_eq!(
        stub.seen.lock().await[0].authorization.as_deref(),
        Some("Bearer stub-token")
    );
}
