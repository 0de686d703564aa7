use chrono::NaiveDate;

use crate::domain::entities::login_history::LoginStatus;
use crate::domain::entities::user::Gender;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{SessionRepository, UserRepository};
use crate::services::auth::PhoneRegistration;
use crate::services::cache::ExpiringCache;
use crate::services::otp::verification_key;

use super::fixtures::{Harness, PHONE};

fn registration(code: &str) -> PhoneRegistration {
    PhoneRegistration {
        phone_number: PHONE.to_string(),
        verification_code: code.to_string(),
        first_name: "Mei".to_string(),
        last_name: "Lin".to_string(),
        nickname: Some("mei".to_string()),
        gender: Some("female".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 12),
        email: None,
    }
}

#[tokio::test]
async fn test_register_creates_user_session_and_history() {
    let h = Harness::new();
    let code = h.registration_code(PHONE).await;

    let response = h
        .service
        .register_with_phone(registration(&code), &Harness::context())
        .await
        .unwrap();
    assert_eq!(response.username, PHONE);
    assert_eq!(response.display_name, "Mei Lin");

    let user = h.store.find_by_phone(PHONE).await.unwrap().unwrap();
    assert_eq!(user.id, response.user_id);
    assert_eq!(user.gender, Some(Gender::Female));
    assert!(user.is_verified);

    assert_eq!(h.store.list_active_for_user(user.id).await.unwrap().len(), 1);
    assert!(!h.cache.exists(&verification_key(PHONE)).await.unwrap());

    let history = h.store.login_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].login_method, "phone");
    assert_eq!(history[0].provider_user_id.as_deref(), Some(PHONE));
    assert_eq!(history[0].status, LoginStatus::Success);

    assert!(h
        .service
        .authenticate(&response.access_token)
        .await
        .unwrap()
        .is_authenticated());
}

#[tokio::test]
async fn test_register_with_wrong_code() {
    let h = Harness::new();
    h.registration_code(PHONE).await;

    let err = h
        .service
        .register_with_phone(registration("000000x"), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidVerificationCode)));
    assert_eq!(h.store.user_count().await, 0);
}

#[tokio::test]
async fn test_register_with_invalid_gender() {
    let h = Harness::new();
    let code = h.registration_code(PHONE).await;
    let mut form = registration(&code);
    form.gender = Some("robot".to_string());

    let err = h
        .service
        .register_with_phone(form, &Harness::context())
        .await
        .unwrap_err();
    match err {
        DomainError::ValidationErr(ValidationError::InvalidGender { allowed }) => {
            assert!(allowed.contains("prefer_not_to_say"));
        }
        other => panic!("expected gender validation error, got {:?}", other),
    }
    assert_eq!(h.store.user_count().await, 0);
    assert!(h.cache.exists(&verification_key(PHONE)).await.unwrap());
}

#[tokio::test]
async fn test_register_existing_phone() {
    let h = Harness::new();
    let code = h.registration_code(PHONE).await;
    h.seed_phone_user(PHONE).await;

    let err = h
        .service
        .register_with_phone(registration(&code), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::PhoneAlreadyRegistered)));
    assert_eq!(h.store.user_count().await, 1);
}

#[tokio::test]
async fn test_wrong_code_reported_before_existing_phone() {
    let h = Harness::new();
    let code = h.registration_code(PHONE).await;
    h.seed_phone_user(PHONE).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = h
        .service
        .register_with_phone(registration(wrong), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidVerificationCode)));
}

#[tokio::test]
async fn test_consumed_code_on_registered_phone_reads_as_registered() {
    let h = Harness::new();
    h.seed_phone_user(PHONE).await;

    let err = h
        .service
        .register_with_phone(registration("123456"), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::PhoneAlreadyRegistered)));
}

#[tokio::test]
async fn test_register_without_pending_code() {
    let h = Harness::new();

    let err = h
        .service
        .register_with_phone(registration("123456"), &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidVerificationCode)));
    assert_eq!(h.store.user_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_registration_creates_one_user() {
    let h = Harness::new();
    let code = h.registration_code(PHONE).await;

    let context = Harness::context();
    let (first, second) = tokio::join!(
        h.service.register_with_phone(registration(&code), &context),
        h.service.register_with_phone(registration(&code), &context),
    );

    let results = [first, second];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    let failure = results.into_iter().find_map(|r| r.err()).unwrap();
    assert!(
        matches!(failure, DomainError::Auth(AuthError::PhoneAlreadyRegistered)),
        "unexpected error {:?}",
        failure
    );

    assert_eq!(h.store.user_count().await, 1);
    assert_eq!(h.store.session_count().await, 1);
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let h = Harness::new();
    h.seed_password_user("taken@example.com").await;
    let code = h.registration_code(PHONE).await;
    let mut form = registration(&code);
    form.email = Some("Taken@Example.com".to_string());

    let err = h
        .service
        .register_with_phone(form, &Harness::context())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
    assert_eq!(h.store.user_count().await, 1);
    assert_eq!(h.store.session_count().await, 0);
}
