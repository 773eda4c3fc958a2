use evep_domain::{DashboardStats, DashboardView};
use serde::Serialize;
use ts_rs::TS;

/// Headline counters.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/dashboard-stats-response.ts"
)]
pub struct DashboardStatsResponse {
    pub total_patients: u64,
    pub total_screenings: u64,
    pub pending_screenings: u64,
    pub completed_screenings: u64,
    pub screenings_today: u64,
    pub active_users: u64,
    /// Completed share of all screenings, in percent.
    pub completion_rate: f64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(value: DashboardStats) -> Self {
        Self {
            completion_rate: value.completion_rate(),
            total_patients: value.total_patients,
            total_screenings: value.total_screenings,
            pending_screenings: value.pending_screenings,
            completed_screenings: value.completed_screenings,
            screenings_today: value.screenings_today,
            active_users: value.active_users,
        }
    }
}

/// Dashboard payload; `stats` is absent whenever `state` is `degraded`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/console-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    /// `live` or `degraded`.
    pub state: String,
    pub stats: Option<DashboardStatsResponse>,
    pub reason: Option<String>,
}

impl From<DashboardView> for DashboardResponse {
    fn from(value: DashboardView) -> Self {
        match value {
            DashboardView::Live { stats } => Self {
                state: "live".to_owned(),
                stats: Some(stats.into()),
                reason: None,
            },
            DashboardView::Degraded { reason } => Self {
                state: "degraded".to_owned(),
                stats: None,
                reason: Some(reason),
            },
        }
    }
}
