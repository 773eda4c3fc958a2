mod common;
mod dashboard;
mod rbac;
mod screenings;
mod settings;
mod users;

pub use common::{ConsoleMeResponse, HealthResponse, NavigationEntryResponse};
pub use dashboard::DashboardResponse;
pub use rbac::{AssignUserRoleRequest, RbacMutationResponse, RbacSnapshotResponse, RoleRequest};
pub use screenings::{
    ScreeningSessionResponse, SessionListParams, StartWizardRequest, SubmittedScreeningResponse,
    UpdateSessionStatusRequest, WizardFieldsDto, WizardResponse,
};
pub use settings::{SettingsDto, SettingsUpdateResponse};
pub use users::{ToggleUserResponse, UserListParams, UserPageResponse, UserResponse};
