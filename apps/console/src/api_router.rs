use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use evep_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let protected_routes = Router::new()
        .route(
            "/console/me",
            get(handlers::me_handler).delete(handlers::forget_me_handler),
        )
        .route("/console/navigation", get(handlers::navigation_handler))
        .route("/console/rbac", get(handlers::rbac_snapshot_handler))
        .route("/console/rbac/roles", post(handlers::create_role_handler))
        .route(
            "/console/rbac/roles/{role_id}",
            put(handlers::update_role_handler).delete(handlers::delete_role_handler),
        )
        .route(
            "/console/rbac/user-roles",
            put(handlers::assign_user_role_handler),
        )
        .route("/console/users", get(handlers::list_users_handler))
        .route(
            "/console/users/{user_id}/toggle-active",
            post(handlers::toggle_user_active_handler),
        )
        .route(
            "/console/screenings/sessions",
            get(handlers::list_sessions_handler),
        )
        .route(
            "/console/screenings/sessions/{session_id}/status",
            put(handlers::update_session_status_handler),
        )
        .route(
            "/console/screenings/wizards",
            post(handlers::start_wizard_handler),
        )
        .route(
            "/console/screenings/wizards/{wizard_id}",
            get(handlers::wizard_handler)
                .put(handlers::update_wizard_handler)
                .delete(handlers::discard_wizard_handler),
        )
        .route(
            "/console/screenings/wizards/{wizard_id}/next",
            post(handlers::next_wizard_step_handler),
        )
        .route(
            "/console/screenings/wizards/{wizard_id}/back",
            post(handlers::previous_wizard_step_handler),
        )
        .route(
            "/console/screenings/wizards/{wizard_id}/complete",
            post(handlers::complete_wizard_handler),
        )
        .route("/console/dashboard", get(handlers::dashboard_handler))
        .route(
            "/console/settings",
            get(handlers::settings_handler).put(handlers::update_settings_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_bearer,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
