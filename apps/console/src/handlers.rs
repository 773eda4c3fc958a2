use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use evep_application::ConsoleSession;
use evep_core::AppError;
use evep_domain::{ScreeningStatus, ScreeningType, SessionListQuery, UserListQuery};

use crate::dto::{
    AssignUserRoleRequest, ConsoleMeResponse, DashboardResponse, HealthResponse,
    NavigationEntryResponse, RbacMutationResponse, RbacSnapshotResponse, RoleRequest,
    ScreeningSessionResponse, SessionListParams, SettingsDto, SettingsUpdateResponse,
    StartWizardRequest, SubmittedScreeningResponse, ToggleUserResponse,
    UpdateSessionStatusRequest, UserListParams, UserPageResponse, UserResponse, WizardFieldsDto,
    WizardResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod dashboard;
mod health;
mod me;
mod rbac;
mod screenings;
mod settings;
mod users;

pub use dashboard::dashboard_handler;
pub use health::health_handler;
pub use me::{forget_me_handler, me_handler, navigation_handler};
pub use rbac::{
    assign_user_role_handler, create_role_handler, delete_role_handler, rbac_snapshot_handler,
    update_role_handler,
};
pub use screenings::{
    complete_wizard_handler, discard_wizard_handler, list_sessions_handler,
    next_wizard_step_handler, previous_wizard_step_handler, start_wizard_handler,
    update_session_status_handler, update_wizard_handler, wizard_handler,
};
pub use settings::{settings_handler, update_settings_handler};
pub use users::{list_users_handler, toggle_user_active_handler};

fn parse_wizard_id(value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("invalid wizard id '{value}'")))
}
