// Integration tests for RBAC-gated user administration, driven through
// real login tokens rather than hand-built claims.

mod common;

use common::{seed_user, setup_backend, TestBackend};
use kantin_backend::errors::user::UserError;
use kantin_backend::stores::audit_store::actions;
use kantin_backend::types::db::audit_event::{Column as AuditColumn, Entity as AuditEvent};
use kantin_backend::types::dto::user::{CreateUserRequest, UpdateProfileRequest};
use kantin_backend::types::internal::auth::{Claims, Role, UserStatus};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

async fn login_claims(backend: &TestBackend, nik: &str, password: &str) -> Claims {
    let (access_token, _, _) = backend
        .auth_service
        .login(nik, password)
        .await
        .expect("login failed");
    backend
        .auth_service
        .authenticate(&access_token)
        .await
        .expect("authenticate failed")
}

fn create_request(nik: &str, username: &str, role: Role) -> CreateUserRequest {
    CreateUserRequest {
        nik: nik.to_string(),
        username: username.to_string(),
        password: "password123".to_string(),
        role,
        full_name: Some(format!("User {}", username)),
        email: None,
        phone: None,
        department_id: None,
    }
}

#[tokio::test]
async fn test_admin_manages_full_user_lifecycle() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    let admin = login_claims(&backend, "100000000001", "adminpass").await;

    // Create
    let created = backend
        .user_service
        .create(&admin, create_request("300000000001", "kurir1", Role::Delivery))
        .await
        .unwrap();
    assert_eq!(created.role, Role::Delivery);
    assert_eq!(created.status, UserStatus::Active);

    // List contains both users and its order is stable across calls
    let listed = backend.user_service.list(&admin).await.unwrap();
    assert_eq!(listed.len(), 2);
    let mut usernames: Vec<_> = listed.iter().map(|u| u.username.as_str()).collect();
    usernames.sort_unstable();
    assert_eq!(usernames, ["admin", "kurir1"]);
    let again = backend.user_service.list(&admin).await.unwrap();
    assert_eq!(
        listed.iter().map(|u| &u.id).collect::<Vec<_>>(),
        again.iter().map(|u| &u.id).collect::<Vec<_>>()
    );

    // Status cycle, visible through get after each patch
    for status in [UserStatus::Inactive, UserStatus::Suspended, UserStatus::Active] {
        backend
            .user_service
            .update_status(&admin, &created.id, status)
            .await
            .unwrap();
        let fetched = backend.user_service.get(&admin, &created.id).await.unwrap();
        assert_eq!(fetched.status, status);
    }

    // Role cycle
    for role in [Role::Administrator, Role::Employee, Role::Dapur, Role::Delivery] {
        backend
            .user_service
            .update_role(&admin, &created.id, role)
            .await
            .unwrap();
        let fetched = backend.user_service.get(&admin, &created.id).await.unwrap();
        assert_eq!(fetched.role, role);
    }

    // Profile update echoes the changed fields only
    let profile = backend
        .user_service
        .update_profile(
            &admin,
            &created.id,
            UpdateProfileRequest {
                username: None,
                full_name: Some("Kurir Satu".to_string()),
                email: None,
                phone: Some("081234567890".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Kurir Satu"));
    assert_eq!(profile.phone.as_deref(), Some("081234567890"));
    assert!(profile.username.is_none());
    assert!(profile.email.is_none());

    // Delete, then the id is gone
    backend.user_service.delete(&admin, &created.id).await.unwrap();
    let gone = backend.user_service.get(&admin, &created.id).await;
    assert!(matches!(gone, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_create_conflicts_and_store_is_unchanged() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    let admin = login_claims(&backend, "100000000001", "adminpass").await;

    backend
        .user_service
        .create(&admin, create_request("300000000001", "kurir1", Role::Delivery))
        .await
        .unwrap();

    // Same nik, different username
    let by_nik = backend
        .user_service
        .create(&admin, create_request("300000000001", "kurir2", Role::Delivery))
        .await;
    assert!(matches!(by_nik, Err(UserError::Conflict(_))));

    // Same username, different nik
    let by_username = backend
        .user_service
        .create(&admin, create_request("300000000002", "kurir1", Role::Delivery))
        .await;
    assert!(matches!(by_username, Err(UserError::Conflict(_))));

    assert_eq!(backend.user_service.list(&admin).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_every_non_admin_role_is_denied_role_update() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    seed_user(&backend, "200000000001", "staff", "staffpass", Role::Employee).await;
    seed_user(&backend, "200000000002", "koki", "kokipass", Role::Dapur).await;
    seed_user(&backend, "200000000003", "kurir", "kurirpass", Role::Delivery).await;

    let admin = login_claims(&backend, "100000000001", "adminpass").await;
    let target = backend
        .user_service
        .create(&admin, create_request("300000000001", "target", Role::Employee))
        .await
        .unwrap();

    for (nik, password) in [
        ("200000000001", "staffpass"),
        ("200000000002", "kokipass"),
        ("200000000003", "kurirpass"),
    ] {
        let requester = login_claims(&backend, nik, password).await;

        let result = backend
            .user_service
            .update_role(&requester, &target.id, Role::Administrator)
            .await;
        assert!(
            matches!(result, Err(UserError::Forbidden(_))),
            "{} should be denied",
            nik
        );

        // Denied attempts leave the role untouched
        let fetched = backend.user_service.get(&admin, &target.id).await.unwrap();
        assert_eq!(fetched.role, Role::Employee);
    }
}

#[tokio::test]
async fn test_reset_password_then_login_with_temp_password() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    let admin = login_claims(&backend, "100000000001", "adminpass").await;

    let created = backend
        .user_service
        .create(&admin, create_request("300000000001", "kurir1", Role::Delivery))
        .await
        .unwrap();

    let response = backend
        .user_service
        .reset_password(&admin, &created.id, None)
        .await
        .unwrap();
    let temp = response.temp_password.expect("temp password expected");

    // Old password 401s, temp password yields a complete login response
    assert!(backend
        .auth_service
        .login("300000000001", "password123")
        .await
        .is_err());

    let (access_token, refresh_token, user) = backend
        .auth_service
        .login("300000000001", &temp)
        .await
        .unwrap();
    assert_eq!(user.id, created.id);
    assert!(!access_token.is_empty());
    assert!(!refresh_token.is_empty());
}

#[tokio::test]
async fn test_mutations_are_audited() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    let admin = login_claims(&backend, "100000000001", "adminpass").await;

    let created = backend
        .user_service
        .create(&admin, create_request("300000000001", "kurir1", Role::Delivery))
        .await
        .unwrap();
    backend
        .user_service
        .update_status(&admin, &created.id, UserStatus::Suspended)
        .await
        .unwrap();
    backend
        .user_service
        .update_role(&admin, &created.id, Role::Dapur)
        .await
        .unwrap();
    backend
        .user_service
        .reset_password(&admin, &created.id, Some("replacement-pass".to_string()))
        .await
        .unwrap();

    for action in [
        actions::USER_CREATED,
        actions::USER_STATUS_CHANGED,
        actions::USER_ROLE_CHANGED,
        actions::PASSWORD_RESET,
    ] {
        let events = AuditEvent::find()
            .filter(AuditColumn::Action.eq(action))
            .all(&backend.db)
            .await
            .unwrap();
        assert_eq!(events.len(), 1, "expected one {} event", action);
        assert_eq!(events[0].user_id.as_deref(), Some(admin.sub.as_str()));
    }
}

#[tokio::test]
async fn test_malformed_and_unknown_ids_are_not_found() {
    let backend = setup_backend().await;
    seed_user(&backend, "100000000001", "admin", "adminpass", Role::Administrator).await;
    let admin = login_claims(&backend, "100000000001", "adminpass").await;

    for id in ["not-a-uuid", "12345", ""] {
        let result = backend.user_service.get(&admin, id).await;
        assert!(
            matches!(result, Err(UserError::NotFound(_))),
            "id {:?} should be NotFound",
            id
        );
    }

    let unknown = backend
        .user_service
        .get(&admin, &uuid::Uuid::new_v4().to_string())
        .await;
    assert!(matches!(unknown, Err(UserError::NotFound(_))));
}
