use chrono::Duration;

use crate::domain::entities::device::DeviceInfo;
use crate::domain::entities::login_history::LoginStatus;
use crate::domain::value_objects::identity::{Credential, ExternalIdentity, ProviderKind};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{SessionRepository, SocialAccountRepository, UserRepository};

use crate::services::auth::LoginContext;

use super::fixtures::{Harness, PASSWORD, PHONE};

fn password(email: &str, password: &str) -> Credential {
    Credential::Password {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_password_login_opens_session_and_records_success() {
    let h = Harness::new();
    let user = h.seed_password_user("alice@example.com").await;

    let response = h
        .service
        .login(ProviderKind::Password, password("Alice@Example.com ", PASSWORD), &Harness::context())
        .await
        .unwrap();

    assert_eq!(response.user_id, user.id);
    assert_eq!(response.token_type, "bearer");
    assert_ne!(response.access_token, response.refresh_token);

    let sessions = h.store.list_active_for_user(user.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].device_type, "ios");
    assert_eq!(sessions[0].ip_address.as_deref(), Some("203.0.113.7"));

    let history = h.store.login_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, LoginStatus::Success);
    assert_eq!(history[0].login_method, "password");
    assert_eq!(history[0].device_type.as_deref(), Some("ios (iOS 17.2.0)"));

    let reloaded = UserRepository::find_by_id(&h.store, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[tokio::test]
async fn test_oversized_device_details_are_truncated_not_rejected() {
    let h = Harness::new();
    let user = h.seed_password_user("alice@example.com").await;

    let context = LoginContext::new(Some(format!("2001:db8::{}", "f".repeat(60))), None).with_device_info(Some(
        DeviceInfo {
            device_model: Some("M".repeat(120)),
            device_os: Some("HarmonyOS-NEXT-Developer-Beta".to_string()),
            device_os_version: Some("5.0.0.102-SP8-DEVELOPER-PREVIEW".to_string()),
            app_version: Some("2.3.0".to_string()),
        },
    ));

    h.service
        .login(ProviderKind::Password, password("alice@example.com", PASSWORD), &context)
        .await
        .unwrap();

    let sessions = h.store.list_active_for_user(user.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].device_type, "HarmonyOS-NEXT-Devel");
    assert_eq!(sessions[0].device_name.as_deref().map(|n| n.chars().count()), Some(100));
    assert_eq!(sessions[0].ip_address.as_deref().map(|ip| ip.chars().count()), Some(45));

    let history = h.store.login_history().await;
    assert_eq!(history[0].status, LoginStatus::Success);
    assert_eq!(history[0].device_type.as_deref().map(|d| d.chars().count()), Some(50));
}

#[tokio::test]
async fn test_wrong_password_records_failed_attempt() {
    let h = Harness::new();
    h.seed_password_user("alice@example.com").await;

    let err = h
        .service
        .login(ProviderKind::Password, password("alice@example.com", "nope"), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredential { .. })));
    assert_eq!(h.store.session_count().await, 0);

    let history = h.store.login_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, LoginStatus::Failed);
    assert_eq!(history[0].user_id, None);
    assert_eq!(history[0].provider_user_id.as_deref(), Some("alice@example.com"));
    assert!(history[0].failure_reason.is_some());
}

#[tokio::test]
async fn test_inactive_user_is_blocked() {
    let h = Harness::new();
    let user = h.seed_password_user("bob@example.com").await;
    h.store.set_user_active(user.id, false).await.unwrap();

    let err = h
        .service
        .login(ProviderKind::Password, password("bob@example.com", PASSWORD), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::UserInactive)));
    assert_eq!(h.store.session_count().await, 0);

    let history = h.store.login_history().await;
    assert_eq!(history[0].status, LoginStatus::Blocked);
    assert_eq!(history[0].user_id, Some(user.id));
}

#[tokio::test]
async fn test_phone_login_consumes_code() {
    let h = Harness::new();
    let user = h.seed_phone_user(PHONE).await;
    let code = h.login_code(PHONE).await;

    let credential = Credential::PhoneOtp {
        phone: PHONE.to_string(),
        code: code.clone(),
    };
    let response = h
        .service
        .login(ProviderKind::Phone, credential.clone(), &Harness::context())
        .await
        .unwrap();
    assert_eq!(response.user_id, user.id);

    let err = h
        .service
        .login(ProviderKind::Phone, credential, &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidVerificationCode)));
}

#[tokio::test]
async fn test_unimplemented_provider_fails() {
    let h = Harness::new();
    let err = h
        .service
        .social_login(ProviderKind::Apple, "apple-token", &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ProviderNotImplemented { .. })));
    assert_eq!(h.store.user_count().await, 0);
}

#[tokio::test]
async fn test_unconfigured_provider_fails() {
    let h = Harness::new();
    let err = h
        .service
        .social_login(ProviderKind::Google, "id-token", &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::ProviderNotConfigured { .. })));
}

#[tokio::test]
async fn test_social_login_is_idempotent_per_provider_account() {
    let h = Harness::new();

    let first = h
        .service
        .social_login(ProviderKind::Line, "token-one", &Harness::context())
        .await
        .unwrap();
    let created = UserRepository::find_by_id(&h.store, first.user_id).await.unwrap().unwrap();
    assert_eq!(created.username, "line_U1234567890abcdef");
    assert_eq!(created.display_name, "Line Tester");
    assert_eq!(created.user_type.as_str(), "viewer");

    let account = h
        .store
        .find_by_provider("line", "U1234567890abcdef")
        .await
        .unwrap()
        .unwrap();
    assert!(account.is_primary);
    let first_used = account.last_used_at;

    h.clock.advance(Duration::minutes(5));
    let second = h
        .service
        .social_login(ProviderKind::Line, "token-two", &Harness::context())
        .await
        .unwrap();

    assert_eq!(second.user_id, first.user_id);
    assert_eq!(h.store.user_count().await, 1);
    assert_eq!(h.store.social_account_count().await, 1);

    let account = h
        .store
        .find_by_provider("line", "U1234567890abcdef")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.access_token.as_deref(), Some("token-two"));
    assert!(account.last_used_at > first_used);
    assert_eq!(h.line.calls(), 2);
}

#[tokio::test]
async fn test_social_display_name_falls_back_to_provider_and_id() {
    let h = Harness::with_line_identity(ExternalIdentity::new("Uabcdef0123456789"));
    let response = h
        .service
        .social_login(ProviderKind::Line, "token", &Harness::context())
        .await
        .unwrap();
    assert_eq!(response.display_name, "LINE User Uabcdef0");
}

#[tokio::test]
async fn test_rejected_social_token_creates_nothing() {
    let h = Harness::new();
    let err = h
        .service
        .social_login(ProviderKind::Line, "bad", &Harness::context())
        .await
        .unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(h.store.user_count().await, 0);
    assert_eq!(h.store.login_history().await[0].status, LoginStatus::Failed);
}
