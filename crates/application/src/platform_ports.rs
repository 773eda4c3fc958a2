mod dashboard;
mod identity;
mod rbac;
mod screenings;
mod settings;
mod users;

pub use dashboard::DashboardGateway;
pub use identity::IdentityGateway;
pub use rbac::RbacGateway;
pub use screenings::ScreeningGateway;
pub use settings::SettingsGateway;
pub use users::{UserDirectoryGateway, UserPage};
