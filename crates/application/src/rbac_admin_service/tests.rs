use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use evep_core::{AppError, AppResult, BearerToken, ConsoleIdentity};
use evep_domain::{PermissionRecord, RoleDraft, RoleForm, RoleRecord, UserRoleAssignment};

use crate::{ConsoleSession, QueryCache, RbacGateway};

use super::RbacAdminService;

#[derive(Default)]
struct CallLog {
    list_roles: usize,
    creates: usize,
    updates: usize,
    deletes: Vec<String>,
    assignments: usize,
}

struct FakeRbacGateway {
    roles: Mutex<Vec<RoleRecord>>,
    server_permissions: Vec<PermissionRecord>,
    calls: Mutex<CallLog>,
    roles_down_after_delete: bool,
    roles_down: Mutex<bool>,
}

impl FakeRbacGateway {
    fn seeded() -> Self {
        Self {
            roles: Mutex::new(vec![
                RoleRecord {
                    id: "role-doctor".to_owned(),
                    name: "Doctor".to_owned(),
                    description: "Clinical staff".to_owned(),
                    permissions: vec!["patient.read".to_owned(), "legacy.flag".to_owned()],
                    is_system: true,
                },
                RoleRecord {
                    id: "role-screener".to_owned(),
                    name: "Screener".to_owned(),
                    description: String::new(),
                    permissions: vec!["screening.conduct".to_owned()],
                    is_system: false,
                },
            ]),
            server_permissions: vec![
                PermissionRecord::new(
                    "patient.read",
                    "Server duplicate",
                    "",
                    "patients",
                    "patient",
                    "read",
                ),
                PermissionRecord::new(
                    "inventory.read",
                    "View Inventory",
                    "",
                    "inventory",
                    "inventory",
                    "read",
                ),
            ],
            calls: Mutex::new(CallLog::default()),
            roles_down_after_delete: false,
            roles_down: Mutex::new(false),
        }
    }

    fn failing_roles_after_delete() -> Self {
        Self {
            roles_down_after_delete: true,
            ..Self::seeded()
        }
    }
}

#[async_trait]
impl RbacGateway for FakeRbacGateway {
    async fn list_roles(&self, _token: &BearerToken) -> AppResult<Vec<RoleRecord>> {
        self.calls.lock().await.list_roles += 1;
        if *self.roles_down.lock().await {
            return Err(AppError::Unavailable("platform returned 502".to_owned()));
        }
        Ok(self.roles.lock().await.clone())
    }

    async fn list_permissions(&self, _token: &BearerToken) -> AppResult<Vec<PermissionRecord>> {
        Ok(self.server_permissions.clone())
    }

    async fn list_user_roles(&self, _token: &BearerToken) -> AppResult<Vec<UserRoleAssignment>> {
        Ok(vec![UserRoleAssignment {
            user_id: "u-2".to_owned(),
            role_id: "role-doctor".to_owned(),
            assigned_at: None,
        }])
    }

    async fn create_role(&self, _token: &BearerToken, draft: &RoleDraft) -> AppResult<RoleRecord> {
        self.calls.lock().await.creates += 1;
        let role = RoleRecord {
            id: "role-new".to_owned(),
            name: draft.name().to_owned(),
            description: draft.description().unwrap_or_default().to_owned(),
            permissions: draft.permissions().to_vec(),
            is_system: false,
        };
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn update_role(
        &self,
        _token: &BearerToken,
        role_id: &str,
        draft: &RoleDraft,
    ) -> AppResult<RoleRecord> {
        self.calls.lock().await.updates += 1;
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter_mut()
            .find(|role| role.id == role_id)
            .ok_or_else(|| AppError::NotFound(role_id.to_owned()))?;
        role.name = draft.name().to_owned();
        role.permissions = draft.permissions().to_vec();
        Ok(role.clone())
    }

    async fn delete_role(&self, _token: &BearerToken, role_id: &str) -> AppResult<()> {
        self.calls.lock().await.deletes.push(role_id.to_owned());
        self.roles.lock().await.retain(|role| role.id != role_id);
        if self.roles_down_after_delete {
            *self.roles_down.lock().await = true;
        }
        Ok(())
    }

    async fn assign_user_role(
        &self,
        _token: &BearerToken,
        user_id: &str,
        role_id: &str,
    ) -> AppResult<UserRoleAssignment> {
        self.calls.lock().await.assignments += 1;
        Ok(UserRoleAssignment {
            user_id: user_id.to_owned(),
            role_id: role_id.to_owned(),
            assigned_at: Some("2026-01-01T00:00:00Z".to_owned()),
        })
    }
}

fn session(role: &str) -> ConsoleSession {
    let Ok(token) = BearerToken::new(format!("token-{role}")) else {
        panic!("valid token");
    };
    ConsoleSession::new(
        token,
        ConsoleIdentity::new("u-1", "admin@evep.local", "Admin", role),
    )
}

fn service() -> (RbacAdminService, Arc<FakeRbacGateway>) {
    service_over(FakeRbacGateway::seeded())
}

fn service_over(gateway: FakeRbacGateway) -> (RbacAdminService, Arc<FakeRbacGateway>) {
    let gateway = Arc::new(gateway);
    let service = RbacAdminService::new(
        gateway.clone(),
        Arc::new(QueryCache::new(Duration::from_secs(60))),
    );
    (service, gateway)
}

#[tokio::test]
async fn snapshot_merges_catalog_without_duplicate_ids() {
    let (service, _) = service();

    let Ok(snapshot) = service.load_snapshot(&session("super_admin")).await else {
        panic!("snapshot should load");
    };

    let patient_read: Vec<&PermissionRecord> = snapshot
        .permissions
        .iter()
        .filter(|permission| permission.id == "patient.read")
        .collect();
    assert_eq!(patient_read.len(), 1);
    assert_ne!(patient_read[0].name, "Server duplicate");
    assert!(
        snapshot
            .permissions
            .iter()
            .any(|permission| permission.id == "inventory.read")
    );
    assert!(snapshot.permission_groups().contains_key("inventory"));
    assert_eq!(
        snapshot.unknown_permissions().get("role-doctor"),
        Some(&vec!["legacy.flag".to_owned()])
    );
}

#[tokio::test]
async fn super_admin_deletes_system_role_and_refetches() {
    let (service, gateway) = service();
    let actor = session("super_admin");
    assert!(service.load_snapshot(&actor).await.is_ok());

    let Ok(outcome) = service.delete_role(&actor, "role-doctor").await else {
        panic!("super admin should delete system role");
    };

    assert_eq!(outcome.message, "Role deleted successfully!");
    assert!(
        outcome
            .snapshot
            .is_some_and(|snapshot| snapshot.roles.iter().all(|role| role.name != "Doctor"))
    );
    let calls = gateway.calls.lock().await;
    assert_eq!(calls.deletes, vec!["role-doctor".to_owned()]);
    assert_eq!(calls.list_roles, 2);
}

#[tokio::test]
async fn failed_refetch_keeps_applied_delete_successful() {
    let (service, gateway) = service_over(FakeRbacGateway::failing_roles_after_delete());
    let actor = session("super_admin");

    let outcome = service.delete_role(&actor, "role-screener").await;

    let Ok(outcome) = outcome else {
        panic!("applied delete should still succeed");
    };
    assert_eq!(outcome.message, "Role deleted successfully!");
    assert!(outcome.snapshot.is_none());
    assert_eq!(gateway.calls.lock().await.deletes, vec!["role-screener".to_owned()]);
}

#[tokio::test]
async fn system_role_is_read_only_for_other_admins() {
    let (service, gateway) = service();
    let actor = session("system_admin");

    let deleted = service.delete_role(&actor, "role-doctor").await;
    let updated = service
        .update_role(
            &actor,
            "role-doctor",
            RoleForm {
                name: "Physician".to_owned(),
                ..RoleForm::default()
            },
        )
        .await;

    assert!(matches!(deleted, Err(AppError::Forbidden(_))));
    assert!(matches!(updated, Err(AppError::Forbidden(_))));
    let calls = gateway.calls.lock().await;
    assert!(calls.deletes.is_empty());
    assert_eq!(calls.updates, 0);
}

#[tokio::test]
async fn custom_role_is_editable_by_system_admin() {
    let (service, gateway) = service();

    let outcome = service
        .update_role(
            &session("system_admin"),
            "role-screener",
            RoleForm {
                name: "Field Screener".to_owned(),
                description: String::new(),
                permissions: vec!["screening.conduct".to_owned(), "screening.mobile_unit".to_owned()],
            },
        )
        .await;

    assert_eq!(
        outcome.map(|outcome| outcome.message).ok(),
        Some("Role updated successfully!")
    );
    assert_eq!(gateway.calls.lock().await.updates, 1);
}

#[tokio::test]
async fn empty_role_name_never_reaches_gateway() {
    let (service, gateway) = service();

    let result = service
        .create_role(
            &session("super_admin"),
            RoleForm {
                name: "   ".to_owned(),
                ..RoleForm::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(gateway.calls.lock().await.creates, 0);
}

#[tokio::test]
async fn created_role_appears_in_refetched_snapshot() {
    let (service, _) = service();
    let actor = session("super_admin");
    assert!(service.load_snapshot(&actor).await.is_ok());

    let Ok(outcome) = service
        .create_role(
            &actor,
            RoleForm {
                name: "Optometrist".to_owned(),
                description: "Eye specialists".to_owned(),
                permissions: vec!["screening.enhanced".to_owned()],
            },
        )
        .await
    else {
        panic!("role should be created");
    };

    assert_eq!(outcome.message, "Role created successfully!");
    assert!(
        outcome
            .snapshot
            .is_some_and(|snapshot| snapshot.roles.iter().any(|role| role.name == "Optometrist"))
    );
}

#[tokio::test]
async fn missing_role_is_not_found() {
    let (service, gateway) = service();

    let result = service.delete_role(&session("super_admin"), "role-ghost").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(gateway.calls.lock().await.deletes.is_empty());
}

#[tokio::test]
async fn roles_without_rbac_menu_are_rejected() {
    let (service, gateway) = service();

    let snapshot = service.load_snapshot(&session("doctor")).await;
    let assigned = service
        .assign_user_role(&session("nurse"), "u-2", "role-screener")
        .await;

    assert!(matches!(snapshot, Err(AppError::Forbidden(_))));
    assert!(matches!(assigned, Err(AppError::Forbidden(_))));
    let calls = gateway.calls.lock().await;
    assert_eq!(calls.list_roles, 0);
    assert_eq!(calls.assignments, 0);
}

#[tokio::test]
async fn assignment_returns_success_message() {
    let (service, gateway) = service();

    let outcome = service
        .assign_user_role(&session("system_admin"), "u-2", "role-screener")
        .await;

    assert_eq!(
        outcome.map(|outcome| outcome.value.role_id).ok().as_deref(),
        Some("role-screener")
    );
    assert_eq!(gateway.calls.lock().await.assignments, 1);
}
