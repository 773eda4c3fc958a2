use std::str::FromStr;

use evep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::ScreeningType;

/// Lifecycle status of a screening session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStatus {
    /// Scheduled, not started.
    Pending,
    /// Examiner is running the screening.
    InProgress,
    /// Results recorded.
    Completed,
    /// Abandoned before completion.
    Cancelled,
}

impl ScreeningStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether the console offers a move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }

        match self {
            Self::Pending => matches!(next, Self::InProgress | Self::Completed | Self::Cancelled),
            _ => next.is_terminal(),
        }
    }

    /// Fails with `Validation` when [`Self::can_transition_to`] is false.
    pub fn ensure_transition_to(&self, next: Self) -> AppResult<()> {
        if self.can_transition_to(next) {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "screening status cannot change from '{}' to '{}'",
            self.as_str(),
            next.as_str()
        )))
    }
}

impl FromStr for ScreeningStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::Validation(format!(
                "unknown screening status '{value}'"
            ))),
        }
    }
}

/// Measurements recorded at the end of a screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningResults {
    /// Left eye visual acuity, e.g. `6/6` or `20/40`.
    pub left_eye_acuity: String,
    /// Right eye visual acuity.
    pub right_eye_acuity: String,
    /// Colour vision outcome, when tested.
    #[serde(default)]
    pub color_vision: Option<String>,
    /// Whether the patient is referred to a specialist.
    #[serde(default)]
    pub referral_needed: bool,
    /// Free-text examiner notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// One vision-test encounter between an examiner and a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningSession {
    /// Platform session identifier.
    pub id: String,
    /// Screened patient.
    pub patient_id: String,
    /// Examiner running the screening.
    pub examiner_id: String,
    /// Screening flavour.
    pub screening_type: ScreeningType,
    /// Lifecycle status.
    pub status: ScreeningStatus,
    /// Recorded results, present once completed.
    #[serde(default)]
    pub results: Option<ScreeningResults>,
    /// Creation timestamp in RFC3339.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Page request for the session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListQuery {
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
    /// Optional status filter.
    pub status: Option<ScreeningStatus>,
}

impl SessionListQuery {
    /// Creates a validated query.
    pub fn new(page: u32, limit: u32, status: Option<ScreeningStatus>) -> AppResult<Self> {
        if page == 0 || limit == 0 || limit > 100 {
            return Err(AppError::Validation(
                "page starts at 1 and limit must be between 1 and 100".to_owned(),
            ));
        }

        Ok(Self {
            page,
            limit,
            status,
        })
    }
}

impl Default for SessionListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            status: None,
        }
    }
}
