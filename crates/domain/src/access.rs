//! Role-driven visibility of console navigation and screening actions.
//!
//! Everything here only decides what the console *shows*. The platform API
//! enforces authorization on every call regardless of what this gate says.

use serde::{Deserialize, Serialize};

/// `(role, granted path prefixes)`
const MENU_ACCESS_TABLE: &[(&str, &[&str])] = &[
    ("super_admin", &["/"]),
    (
        "system_admin",
        &[
            "/dashboard",
            "/patients",
            "/screenings",
            "/reports",
            "/users",
            "/rbac",
            "/settings",
        ],
    ),
    (
        "admin",
        &[
            "/dashboard",
            "/patients",
            "/screenings/standard",
            "/screenings/mobile-unit",
            "/screenings/sessions",
            "/reports",
            "/users",
        ],
    ),
    (
        "medical_admin",
        &[
            "/dashboard",
            "/patients",
            "/screenings",
            "/reports",
            "/users",
        ],
    ),
    ("doctor", &["/dashboard", "/patients", "/screenings", "/reports"]),
    (
        "nurse",
        &[
            "/dashboard",
            "/patients",
            "/screenings/standard",
            "/screenings/mobile-unit",
            "/screenings/sessions",
        ],
    ),
    ("teacher", &["/dashboard", "/screenings/standard"]),
];

/// Returns whether a role may see the console entry at `path`.
///
/// Unknown roles, unknown paths and relative paths all yield `false`.
/// Prefixes match whole path segments, so `/screenings` grants
/// `/screenings/enhanced` but not `/screenings-archive`.
#[must_use]
pub fn has_menu_access(role: &str, path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }

    MENU_ACCESS_TABLE
        .iter()
        .find(|(table_role, _)| *table_role == role)
        .is_some_and(|(_, prefixes)| prefixes.iter().any(|prefix| path_has_prefix(path, prefix)))
}

fn path_has_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Screening flavours offered as separate buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningType {
    /// School or clinic screening with the basic chart.
    Standard,
    /// Screening run from a mobile unit on site.
    MobileUnit,
    /// Specialist screening with additional equipment.
    Enhanced,
}

impl ScreeningType {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MobileUnit => "mobile_unit",
            Self::Enhanced => "enhanced",
        }
    }

    /// Returns the button label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::MobileUnit => "Mobile Unit",
            Self::Enhanced => "Enhanced",
        }
    }

    /// Returns the console route gated for this type.
    #[must_use]
    pub fn route(&self) -> &'static str {
        match self {
            Self::Standard => "/screenings/standard",
            Self::MobileUnit => "/screenings/mobile-unit",
            Self::Enhanced => "/screenings/enhanced",
        }
    }

    /// Returns all types in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ScreeningType] = &[
            ScreeningType::Standard,
            ScreeningType::MobileUnit,
            ScreeningType::Enhanced,
        ];

        ALL
    }

    /// Parses a transport value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|screening_type| screening_type.as_str() == value)
    }
}

/// Returns the screening buttons visible to a role.
#[must_use]
pub fn visible_screening_types(role: &str) -> Vec<ScreeningType> {
    ScreeningType::all()
        .iter()
        .copied()
        .filter(|screening_type| has_menu_access(role, screening_type.route()))
        .collect()
}

/// One entry of the console side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Menu label.
    pub label: &'static str,
    /// Console route.
    pub path: &'static str,
}

const NAVIGATION: &[NavigationEntry] = &[
    NavigationEntry {
        label: "Dashboard",
        path: "/dashboard",
    },
    NavigationEntry {
        label: "Patients",
        path: "/patients",
    },
    NavigationEntry {
        label: "Screening Sessions",
        path: "/screenings/sessions",
    },
    NavigationEntry {
        label: "Reports",
        path: "/reports",
    },
    NavigationEntry {
        label: "User Management",
        path: "/users",
    },
    NavigationEntry {
        label: "Roles & Permissions",
        path: "/rbac",
    },
    NavigationEntry {
        label: "Settings",
        path: "/settings",
    },
];

/// Returns the navigation entries visible to a role, in menu order.
#[must_use]
pub fn visible_navigation(role: &str) -> Vec<NavigationEntry> {
    NAVIGATION
        .iter()
        .copied()
        .filter(|entry| has_menu_access(role, entry.path))
        .collect()
}
