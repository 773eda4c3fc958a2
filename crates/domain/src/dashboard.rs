use serde::{Deserialize, Serialize};

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Registered patients.
    pub total_patients: u64,
    /// All screening sessions.
    pub total_screenings: u64,
    /// Sessions not yet started.
    pub pending_screenings: u64,
    /// Sessions with recorded results.
    pub completed_screenings: u64,
    /// Sessions created today.
    #[serde(default)]
    pub screenings_today: u64,
    /// Users that can sign in.
    #[serde(default)]
    pub active_users: u64,
}

impl DashboardStats {
    /// Share of sessions completed, in percent.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        if self.total_screenings == 0 {
            return 0.0;
        }

        self.completed_screenings as f64 / self.total_screenings as f64 * 100.0
    }
}

/// What the dashboard can show for the current request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    /// Fresh counters from the platform.
    Live {
        /// Platform counters.
        stats: DashboardStats,
    },
    /// The platform could not be read; no numbers are shown.
    Degraded {
        /// Operator-facing reason.
        reason: String,
    },
}

impl DashboardView {
    /// Returns whether the view carries live data.
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }
}
