use evep_core::ConsoleIdentity;
use evep_domain::{
    AdminUser, PermissionRecord, RoleRecord, ScreeningResults, ScreeningSession, ScreeningStatus,
    ScreeningType, UserRoleAssignment,
};

use super::{InMemoryPlatform, now_rfc3339};

/// `(token, user id, email, name, role)`
const SEED_ACCOUNTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "dev-super-admin",
        "u-super-admin",
        "superadmin@evep.local",
        "Super Admin",
        "super_admin",
    ),
    (
        "dev-system-admin",
        "u-system-admin",
        "sysadmin@evep.local",
        "System Admin",
        "system_admin",
    ),
    ("dev-admin", "u-admin", "admin@evep.local", "Clinic Admin", "admin"),
    (
        "dev-medical-admin",
        "u-medical-admin",
        "medadmin@evep.local",
        "Medical Admin",
        "medical_admin",
    ),
    ("dev-doctor", "u-doctor", "doctor@evep.local", "Dr. Somsri", "doctor"),
    ("dev-nurse", "u-nurse", "nurse@evep.local", "Nurse Malee", "nurse"),
    (
        "dev-teacher",
        "u-teacher",
        "teacher@evep.local",
        "Kru Somchai",
        "teacher",
    ),
];

/// `(id, name, description, permission ids)`
const SEED_SYSTEM_ROLES: &[(&str, &str, &str, &[&str])] = &[
    (
        "super_admin",
        "Super Admin",
        "Unrestricted platform access",
        &["system.settings", "rbac.role.manage", "rbac.user_role.assign"],
    ),
    (
        "system_admin",
        "System Admin",
        "Platform configuration and access control",
        &["system.settings", "rbac.role.read", "rbac.role.manage", "user.manage"],
    ),
    (
        "admin",
        "Admin",
        "Clinic administration",
        &["user.read", "user.manage", "report.read"],
    ),
    (
        "medical_admin",
        "Medical Admin",
        "Clinical supervision",
        &["patient.read", "screening.read", "report.export"],
    ),
    (
        "doctor",
        "Doctor",
        "Clinical staff running any screening",
        &[
            "patient.read",
            "screening.conduct",
            "screening.enhanced",
            "report.read",
        ],
    ),
    (
        "nurse",
        "Nurse",
        "Standard and mobile unit screenings",
        &["patient.read", "screening.conduct", "screening.mobile_unit"],
    ),
    (
        "teacher",
        "Teacher",
        "School-based standard screenings",
        &["screening.conduct"],
    ),
];

impl InMemoryPlatform {
    /// Creates a platform pre-filled with one account per console role.
    ///
    /// Each account signs in with the token `dev-<role>` (underscores as
    /// dashes), e.g. `dev-super-admin`.
    pub async fn seeded() -> Self {
        let platform = Self::new();

        for (token, user_id, email, name, role) in SEED_ACCOUNTS {
            platform
                .register_token(*token, ConsoleIdentity::new(*user_id, *email, *name, *role))
                .await;
            platform.users.write().await.push(AdminUser {
                id: (*user_id).to_owned(),
                email: (*email).to_owned(),
                name: (*name).to_owned(),
                role: (*role).to_owned(),
                department: None,
                is_active: true,
                last_login: None,
            });
            platform.user_roles.write().await.push(UserRoleAssignment {
                user_id: (*user_id).to_owned(),
                role_id: (*role).to_owned(),
                assigned_at: Some(now_rfc3339()),
            });
        }

        platform.roles.write().await.extend(SEED_SYSTEM_ROLES.iter().map(
            |(id, name, description, permissions)| RoleRecord {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
                description: (*description).to_owned(),
                permissions: permissions.iter().map(|id| (*id).to_owned()).collect(),
                is_system: true,
            },
        ));

        platform.permissions.write().await.push(PermissionRecord::new(
            "screening.schedule",
            "Schedule Screenings",
            "Plan school screening days",
            "screening",
            "screening",
            "schedule",
        ));

        platform.sessions.write().await.extend([
            seed_session("s-1001", "p-2001", ScreeningType::Standard, ScreeningStatus::Pending),
            seed_session(
                "s-1002",
                "p-2002",
                ScreeningType::MobileUnit,
                ScreeningStatus::InProgress,
            ),
            ScreeningSession {
                results: Some(ScreeningResults {
                    left_eye_acuity: "6/6".to_owned(),
                    right_eye_acuity: "6/18".to_owned(),
                    color_vision: Some("normal".to_owned()),
                    referral_needed: true,
                    notes: Some("refer for refraction".to_owned()),
                }),
                ..seed_session(
                    "s-1003",
                    "p-2003",
                    ScreeningType::Standard,
                    ScreeningStatus::Completed,
                )
            },
        ]);

        platform
    }
}

fn seed_session(
    id: &str,
    patient_id: &str,
    screening_type: ScreeningType,
    status: ScreeningStatus,
) -> ScreeningSession {
    ScreeningSession {
        id: id.to_owned(),
        patient_id: patient_id.to_owned(),
        examiner_id: "u-nurse".to_owned(),
        screening_type,
        status,
        results: None,
        created_at: Some(now_rfc3339()),
    }
}
