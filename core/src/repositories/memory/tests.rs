use chrono::{Duration, Utc};

use super::*;

fn new_session(access: &str, refresh: &str) -> NewSession {
    let now = Utc::now();
    NewSession {
        access_token_jti: access.to_string(),
        refresh_token_jti: refresh.to_string(),
        device_type: "desktop".to_string(),
        device_name: None,
        ip_address: Some("127.0.0.1".to_string()),
        user_agent: None,
        expires_at: now + Duration::days(7),
        created_at: now,
    }
}

fn phone_user(phone: &str) -> NewUser {
    let mut user = NewUser::viewer(phone, "Test User", Utc::now());
    user.phone_number = Some(phone.to_string());
    user
}

#[tokio::test]
async fn test_duplicate_phone_is_conflict() {
    let store = InMemoryStore::new();
    store.create(phone_user("+886912345678")).await.unwrap();

    let err = store.create(phone_user("+886912345678")).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn test_duplicate_jti_rejected() {
    let store = InMemoryStore::new();
    store.create_session(1, new_session("a1", "r1")).await.unwrap();

    let same_access = store.create_session(1, new_session("a1", "r2")).await;
    let same_refresh = store.create_session(2, new_session("a2", "r1")).await;

    assert!(matches!(same_access, Err(DomainError::Conflict { .. })));
    assert!(matches!(same_refresh, Err(DomainError::Conflict { .. })));
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn test_deactivate_by_refresh_jti_is_idempotent() {
    let store = InMemoryStore::new();
    let session = store.create_session(1, new_session("a1", "r1")).await.unwrap();

    assert!(store.deactivate_by_refresh_jti("r1").await.unwrap());
    assert!(!store.deactivate_by_refresh_jti("r1").await.unwrap());
    assert!(!store.deactivate_by_refresh_jti("unknown").await.unwrap());

    let stored = SessionRepository::find_by_id(&store, session.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert!(store.find_active_by_refresh_jti("r1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rotation_keeps_refresh_jti_and_expiry() {
    let store = InMemoryStore::new();
    let session = store.create_session(1, new_session("a1", "r1")).await.unwrap();
    let later = session.created_at + Duration::minutes(5);

    store.rotate_access_token(session.id, "a2", later).await.unwrap();

    let rotated = store.find_by_access_jti("a2").await.unwrap().unwrap();
    assert_eq!(rotated.id, session.id);
    assert_eq!(rotated.refresh_token_jti, "r1");
    assert_eq!(rotated.expires_at, session.expires_at);
    assert_eq!(rotated.last_activity_at, later);
    assert!(store.find_by_access_jti("a1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_registration_commits_nothing() {
    let store = InMemoryStore::new();
    store.create_session(99, new_session("taken", "r0")).await.unwrap();

    let result = store
        .create_user_with_session(phone_user("+66812345678"), new_session("taken", "r1"))
        .await;

    assert!(result.is_err());
    assert_eq!(store.user_count().await, 0);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn test_social_account_pair_is_unique() {
    let store = InMemoryStore::new();
    let account = NewSocialAccount {
        provider: "line".to_string(),
        provider_user_id: "U1".to_string(),
        provider_username: None,
        access_token: Some("tok".to_string()),
        is_primary: true,
        linked_at: Utc::now(),
    };

    store
        .create_user_with_social_account(NewUser::viewer("line_U1", "A", Utc::now()), account.clone())
        .await
        .unwrap();
    let second = store
        .create_user_with_social_account(NewUser::viewer("line_U1_b", "B", Utc::now()), account)
        .await;

    assert!(matches!(second, Err(DomainError::Conflict { .. })));
    assert_eq!(store.user_count().await, 1);
    assert_eq!(store.social_account_count().await, 1);
}

#[tokio::test]
async fn test_history_listed_most_recent_first() {
    let store = InMemoryStore::new();
    for method in ["password", "phone", "line"] {
        store
            .append(NewLoginHistory {
                user_id: Some(5),
                login_method: method.to_string(),
                provider_user_id: None,
                ip_address: None,
                user_agent: None,
                device_type: None,
                status: crate::domain::entities::LoginStatus::Success,
                failure_reason: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let recent = LoginHistoryRepository::list_for_user(&store, 5, 2).await.unwrap();
    let methods: Vec<&str> = recent.iter().map(|h| h.login_method.as_str()).collect();
    assert_eq!(methods, vec!["line", "phone"]);
    assert!(LoginHistoryRepository::list_for_user(&store, 6, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_only_active_countries_listed() {
    let mut countries = default_countries();
    countries[0].is_active = false;
    let store = InMemoryStore::with_countries(countries);

    let listed = store.list_active().await.unwrap();
    assert!(listed.iter().all(|c| c.country_code != "TW"));
    assert_eq!(listed.len(), default_countries().len() - 1);
}
