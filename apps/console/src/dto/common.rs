use evep_application::ConsoleSession;
use evep_domain::{NavigationEntry, ScreeningType};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One side navigation entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/navigation-entry-response.ts"
)]
pub struct NavigationEntryResponse {
    pub label: String,
    pub path: String,
}

impl From<NavigationEntry> for NavigationEntryResponse {
    fn from(value: NavigationEntry) -> Self {
        Self {
            label: value.label.to_owned(),
            path: value.path.to_owned(),
        }
    }
}

/// One screening button.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/screening-type-response.ts"
)]
pub struct ScreeningTypeResponse {
    pub value: String,
    pub label: String,
    pub route: String,
}

impl From<ScreeningType> for ScreeningTypeResponse {
    fn from(value: ScreeningType) -> Self {
        Self {
            value: value.as_str().to_owned(),
            label: value.label().to_owned(),
            route: value.route().to_owned(),
        }
    }
}

/// The signed-in user and what the console shows them.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/console-me-response.ts"
)]
pub struct ConsoleMeResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub navigation: Vec<NavigationEntryResponse>,
    pub screening_types: Vec<ScreeningTypeResponse>,
}

impl ConsoleMeResponse {
    pub fn new(
        session: &ConsoleSession,
        navigation: Vec<NavigationEntry>,
        screening_types: Vec<ScreeningType>,
    ) -> Self {
        let identity = session.identity();

        Self {
            user_id: identity.user_id().to_owned(),
            email: identity.email().to_owned(),
            name: identity.name().to_owned(),
            role: identity.role().to_owned(),
            navigation: navigation.into_iter().map(Into::into).collect(),
            screening_types: screening_types.into_iter().map(Into::into).collect(),
        }
    }
}
