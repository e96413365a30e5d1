//! Service-level session lifecycle tests
//!
//! Exercise the auth service and session manager over in-memory fakes:
//! login/logout, refresh rotation, revocation TTLs, and the documented
//! concurrent-refresh race.

use std::time::Duration;

use account_common::AppError;
use account_service::{
    AuthService, ClientInfo, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    ServiceError,
};
use integration_tests::helpers::TestEnv;

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "Password123".to_string(),
        role: None,
    }
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
        device_info: Some("test-device".to_string()),
    }
}

fn client() -> ClientInfo {
    ClientInfo {
        device_info: String::new(),
        ip_address: "10.0.0.1".to_string(),
        user_agent: "integration-test".to_string(),
    }
}

#[tokio::test]
async fn login_issues_pair_and_creates_session() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    let user = service.register(register_request("alice")).await.unwrap();
    let response = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    assert!(!response.access_token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.user.username, "alice");

    // Session record holds the issued refresh token and client metadata
    let record = env.context.session_manager().get_session(user.id).await.unwrap();
    assert_eq!(record.refresh_token, response.refresh_token);
    assert_eq!(record.device_info, "test-device");
    assert_eq!(record.ip_address, "10.0.0.1");

    // Login marks the user active and caches permissions
    assert!(env.context.session_manager().is_active(user.id).await);
    let cached = env
        .context
        .session_manager()
        .get_cached_permissions(user.id)
        .await
        .unwrap();
    assert_eq!(cached.role, "user");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);
    service.register(register_request("alice")).await.unwrap();

    let unknown_user = service
        .login(login_request("nobody", "Password123"), client())
        .await
        .unwrap_err();
    let wrong_password = service
        .login(login_request("alice", "WrongPassword1"), client())
        .await
        .unwrap_err();

    assert!(matches!(
        unknown_user,
        ServiceError::App(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        wrong_password,
        ServiceError::App(AppError::InvalidCredentials)
    ));
    // Byte-identical message: no username enumeration oracle
    assert_eq!(unknown_user.to_string(), wrong_password.to_string());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);
    service.register(register_request("alice")).await.unwrap();

    let err = service.register(register_request("alice")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn refresh_rotates_the_refresh_token() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    let user = service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    let refreshed = service
        .refresh(RefreshTokenRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await
        .unwrap();
    assert!(!refreshed.access_token.is_empty());

    // The session now holds a new refresh token, same metadata
    let record = env.context.session_manager().get_session(user.id).await.unwrap();
    assert_ne!(record.refresh_token, login.refresh_token);
    assert_eq!(record.device_info, "test-device");

    // The superseded token fails the byte-for-byte comparison
    let err = service
        .refresh(RefreshTokenRequest {
            refresh_token: login.refresh_token,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::App(AppError::RefreshMismatch)));
}

#[tokio::test]
async fn refresh_with_access_token_is_rejected() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    let err = service
        .refresh(RefreshTokenRequest {
            refresh_token: login.access_token,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::App(AppError::WrongTokenType)));
}

#[tokio::test]
async fn logout_revokes_tokens_and_deletes_session() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    let user = service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    service
        .logout(
            user.id,
            &login.access_token,
            LogoutRequest {
                refresh_token: Some(login.refresh_token.clone()),
            },
        )
        .await
        .unwrap();

    // Both token ids are blacklisted for their remaining lifetimes
    let access_claims = env.context.jwt_service().verify(&login.access_token).unwrap();
    assert!(env.context.session_manager().is_blacklisted(&access_claims.jti).await);

    let err = env
        .context
        .session_manager()
        .validate_refresh(&login.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TokenRevoked));

    // The session record is gone
    let err = env.context.session_manager().get_session(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound));
}

#[tokio::test]
async fn logout_blacklist_expires_with_the_token() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    let user = service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    service
        .logout(user.id, &login.access_token, LogoutRequest::default())
        .await
        .unwrap();

    let claims = env.context.jwt_service().verify(&login.access_token).unwrap();
    assert!(env.context.session_manager().is_blacklisted(&claims.jti).await);

    // Once the access token's own lifetime has elapsed, the blacklist entry
    // may disappear: the token cannot be replayed past its expiry anyway
    env.store.advance(Duration::from_secs(31 * 60));
    assert!(!env.context.session_manager().is_blacklisted(&claims.jti).await);
}

#[tokio::test]
async fn concurrent_refresh_race_is_documented_not_fixed() {
    // Two refresh calls race on the same valid refresh token. Staged
    // deterministically: both validations happen before either overwrite,
    // exactly the interleaving the design accepts.
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);
    let manager = env.context.session_manager();
    let jwt = env.context.jwt_service();

    let user = service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    // Both "requests" validate the same original token, and both pass
    let first = manager.validate_refresh(&login.refresh_token).await;
    let second = manager.validate_refresh(&login.refresh_token).await;
    assert!(first.is_ok());
    assert!(second.is_ok());

    // Both reissue and overwrite the session; last writer wins
    let pair_one = jwt.issue_pair(user.id, "alice", "user").unwrap();
    let pair_two = jwt.issue_pair(user.id, "alice", "user").unwrap();
    manager
        .create_session(user.id, "alice", &pair_one.refresh_token, "", "", "")
        .await
        .unwrap();
    manager
        .create_session(user.id, "alice", &pair_two.refresh_token, "", "", "")
        .await
        .unwrap();

    let record = manager.get_session(user.id).await.unwrap();
    assert_eq!(record.refresh_token, pair_two.refresh_token);

    // The losing write's refresh token is rejected...
    let err = manager.validate_refresh(&pair_one.refresh_token).await.unwrap_err();
    assert!(matches!(err, AppError::RefreshMismatch));

    // ...but both access tokens issued mid-race stay valid until their own
    // natural expiry; no revocation reaches them
    assert!(jwt.verify(&pair_one.access_token).is_ok());
    assert!(jwt.verify(&pair_two.access_token).is_ok());
    assert!(jwt.verify(&login.access_token).is_ok());
}

#[tokio::test]
async fn session_expires_after_refresh_lifetime() {
    let env = TestEnv::new();
    let service = AuthService::new(&env.context);

    let user = service.register(register_request("alice")).await.unwrap();
    let login = service
        .login(login_request("alice", "Password123"), client())
        .await
        .unwrap();

    env.store.advance(integration_tests::helpers::SESSION_TTL + Duration::from_secs(1));

    let err = env.context.session_manager().get_session(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound));

    // And the refresh token can no longer find its session
    let err = service
        .refresh(RefreshTokenRequest {
            refresh_token: login.refresh_token,
        })
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}
