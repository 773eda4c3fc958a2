//! Console-facing user records.

use std::str::FromStr;

use evep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Activation status shown in the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User can sign in.
    Active,
    /// User is blocked from signing in.
    Inactive,
}

impl UserStatus {
    /// Returns the status string used by the user table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Maps the platform `is_active` flag onto a status.
    #[must_use]
    pub fn from_is_active(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Returns the platform `is_active` flag for this status.
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// User record returned by the user-management endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Platform user identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Active role name.
    pub role: String,
    /// Optional department or school.
    #[serde(default)]
    pub department: Option<String>,
    /// Whether the user can sign in.
    pub is_active: bool,
    /// Last sign-in in RFC3339.
    #[serde(default)]
    pub last_login: Option<String>,
}

impl AdminUser {
    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        UserStatus::from_is_active(self.is_active)
    }
}

/// Page request for the user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
    /// Optional name/email search term.
    pub search: Option<String>,
}

impl UserListQuery {
    /// Largest page size accepted by the console.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a validated query.
    pub fn new(page: u32, limit: u32, search: Option<String>) -> AppResult<Self> {
        if page == 0 {
            return Err(AppError::Validation("page starts at 1".to_owned()));
        }

        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }

        let search = search.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            page,
            limit,
            search,
        })
    }
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
        }
    }
}
