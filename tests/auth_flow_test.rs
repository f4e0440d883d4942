// Integration tests for the authentication/session lifecycle:
// login -> authenticated requests -> refresh rotation -> logout revocation.

mod common;

use common::{seed_user, setup_backend};
use kantin_backend::errors::auth::AuthError;
use kantin_backend::types::internal::auth::{Role, UserStatus};

#[tokio::test]
async fn test_full_session_lifecycle() {
    let backend = setup_backend().await;
    seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    // Login yields a working access token and the user record
    let (access_token, refresh_token, user) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();

    let claims = backend.auth_service.authenticate(&access_token).await.unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.nik, "199001010001");
    assert_eq!(claims.role, Role::Employee);

    let profile = backend.auth_service.current_user(&claims).await.unwrap();
    assert_eq!(profile.username, "budi");

    // Refresh rotates the pair; the old refresh token is consumed
    let (new_access, new_refresh) = backend.auth_service.refresh(&refresh_token).await.unwrap();
    assert!(backend.auth_service.authenticate(&new_access).await.is_ok());

    let replay = backend.auth_service.refresh(&refresh_token).await;
    assert!(matches!(replay, Err(AuthError::InvalidRefreshToken(_))));

    // Logout through the rotated access token kills the whole session
    let new_claims = backend.auth_service.authenticate(&new_access).await.unwrap();
    backend.auth_service.logout(&new_claims).await.unwrap();

    let revoked = backend.auth_service.authenticate(&new_access).await;
    assert!(matches!(revoked, Err(AuthError::RevokedToken(_))));

    let dead_refresh = backend.auth_service.refresh(&new_refresh).await;
    assert!(matches!(dead_refresh, Err(AuthError::InvalidRefreshToken(_))));
}

#[tokio::test]
async fn test_pre_rotation_access_token_survives_until_logout() {
    let backend = setup_backend().await;
    seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    let (access_token, refresh_token, _) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();

    // Rotation consumes the refresh token but does not revoke the access
    // token issued at login; that one dies by expiry or logout
    backend.auth_service.refresh(&refresh_token).await.unwrap();

    assert!(backend.auth_service.authenticate(&access_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_chain_rotates_through_many_exchanges() {
    let backend = setup_backend().await;
    seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    let (_, mut refresh_token, _) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();

    let mut consumed = Vec::new();

    for _ in 0..5 {
        consumed.push(refresh_token.clone());
        let (_, next) = backend.auth_service.refresh(&refresh_token).await.unwrap();
        refresh_token = next;
    }

    // Every consumed token in the chain stays dead
    for old in consumed {
        let result = backend.auth_service.refresh(&old).await;
        assert!(matches!(result, Err(AuthError::InvalidRefreshToken(_))));
    }

    // The head of the chain still works
    assert!(backend.auth_service.refresh(&refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_multi_device_sessions_are_independent() {
    let backend = setup_backend().await;
    seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    let (access1, refresh1, _) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();
    let (access2, refresh2, _) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();

    // Logging out device 1 leaves device 2 fully functional
    let claims1 = backend.auth_service.authenticate(&access1).await.unwrap();
    backend.auth_service.logout(&claims1).await.unwrap();

    assert!(matches!(
        backend.auth_service.authenticate(&access1).await,
        Err(AuthError::RevokedToken(_))
    ));
    assert!(matches!(
        backend.auth_service.refresh(&refresh1).await,
        Err(AuthError::InvalidRefreshToken(_))
    ));

    assert!(backend.auth_service.authenticate(&access2).await.is_ok());
    assert!(backend.auth_service.refresh(&refresh2).await.is_ok());
}

#[tokio::test]
async fn test_login_failures_never_reveal_which_element_was_wrong() {
    let backend = setup_backend().await;
    seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    let cases = [
        ("199001010001", "wrong-password"),
        ("000000000000", "rahasia123"),
        ("", "rahasia123"),
        ("199001010001", ""),
        ("", ""),
    ];

    let mut messages = Vec::new();
    for (nik, password) in cases {
        match backend.auth_service.login(nik, password).await {
            Err(err @ AuthError::InvalidCredentials(_)) => messages.push(err.message()),
            other => panic!("expected InvalidCredentials, got {:?}", other.map(|_| ())),
        }
    }

    // Identical outward message for every failure cause
    assert!(messages.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_suspended_user_cannot_login_or_refresh() {
    let backend = setup_backend().await;
    let user = seed_user(&backend, "199001010001", "budi", "rahasia123", Role::Employee).await;

    let (_, refresh_token, _) = backend
        .auth_service
        .login("199001010001", "rahasia123")
        .await
        .unwrap();

    backend
        .user_store
        .update_status(&user.id, UserStatus::Suspended)
        .await
        .unwrap();

    let login = backend.auth_service.login("199001010001", "rahasia123").await;
    assert!(matches!(login, Err(AuthError::InvalidCredentials(_))));

    let refresh = backend.auth_service.refresh(&refresh_token).await;
    assert!(matches!(refresh, Err(AuthError::InvalidRefreshToken(_))));
}

#[tokio::test]
async fn test_password_reset_swaps_login_credentials() {
    let backend = setup_backend().await;
    let user = seed_user(&backend, "199001010001", "budi", "old-password", Role::Employee).await;

    backend
        .user_store
        .set_password(&user.id, "new-password")
        .await
        .unwrap();

    let old = backend.auth_service.login("199001010001", "old-password").await;
    assert!(matches!(old, Err(AuthError::InvalidCredentials(_))));

    let (access_token, refresh_token, logged_in) = backend
        .auth_service
        .login("199001010001", "new-password")
        .await
        .unwrap();

    // The new session is schema-complete and fully functional
    assert_eq!(logged_in.id, user.id);
    assert!(!access_token.is_empty());
    assert!(!refresh_token.is_empty());
    assert!(backend.auth_service.authenticate(&access_token).await.is_ok());
}
