//! Unit tests for the token codec

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;

use crate::domain::entities::token::{TokenRejection, TokenSubject, TokenType};
use crate::services::clock::ManualClock;
use crate::services::token::{TokenCodec, TokenServiceConfig};

fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: "unit-test-secret-value".to_string(),
        ..TokenServiceConfig::default()
    }
}

fn codec_with_clock() -> (TokenCodec, ManualClock) {
    let clock = ManualClock::starting_now();
    let codec = TokenCodec::with_clock(test_config(), Arc::new(clock.clone()));
    (codec, clock)
}

#[test]
fn test_access_token_round_trip() {
    let (codec, _) = codec_with_clock();
    let subject = TokenSubject::new(42, "alice");

    let issued = codec.issue_access_token(&subject, 30).unwrap();
    let claims = codec.decode_token(&issued.token).unwrap();

    assert_eq!(claims.user_id(), Some(42));
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.jti, issued.jti);
    assert_eq!(claims.iss, "live-commerce");
    assert_eq!(claims.aud, "live-commerce-api");
}

#[test]
fn test_jti_unique_across_ten_thousand_issuances() {
    let (codec, _) = codec_with_clock();
    let subject = TokenSubject::new(1, "bulk");

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let issued = codec.issue_access_token(&subject, 30).unwrap();
        let claims = codec.decode_token(&issued.token).unwrap();
        assert!(seen.insert(claims.jti), "duplicate jti issued");
    }
    assert_eq!(seen.len(), 10_000);
}

#[test]
fn test_refresh_token_carries_refresh_type() {
    let (codec, _) = codec_with_clock();
    let issued = codec
        .issue_refresh_token(&TokenSubject::new(7, "bob"), 7)
        .unwrap();

    let claims = codec.decode_expecting(&issued.token, TokenType::Refresh).unwrap();
    assert_eq!(claims.token_type, TokenType::Refresh);
    assert_eq!(
        codec.decode_expecting(&issued.token, TokenType::Access),
        Err(TokenRejection::WrongType)
    );
}

#[test]
fn test_expired_token_rejected() {
    let (codec, clock) = codec_with_clock();
    let issued = codec.issue_access_token(&TokenSubject::new(1, "a"), 30).unwrap();

    clock.advance(Duration::minutes(30));
    assert!(codec.decode_token(&issued.token).is_ok());

    clock.advance(Duration::seconds(1));
    assert_eq!(codec.decode_token(&issued.token), Err(TokenRejection::Expired));
}

#[test]
fn test_wrong_secret_and_garbage_rejected() {
    let (codec, _) = codec_with_clock();
    let issued = codec.issue_access_token(&TokenSubject::new(1, "a"), 30).unwrap();

    let other = TokenCodec::new(TokenServiceConfig {
        jwt_secret: "a-completely-different-secret".to_string(),
        ..TokenServiceConfig::default()
    });
    assert_eq!(other.decode_token(&issued.token), Err(TokenRejection::InvalidSignature));
    assert_eq!(codec.decode_token("not.a.jwt"), Err(TokenRejection::Malformed));
    assert_eq!(codec.decode_token(""), Err(TokenRejection::Malformed));
}

#[test]
fn test_foreign_audience_rejected() {
    let (codec, _) = codec_with_clock();
    let foreign = TokenCodec::new(TokenServiceConfig {
        audience: "another-api".to_string(),
        ..test_config()
    });
    let issued = foreign.issue_access_token(&TokenSubject::new(1, "a"), 30).unwrap();

    assert_eq!(codec.decode_token(&issued.token), Err(TokenRejection::InvalidClaims));
}

#[test]
fn test_grant_expiry_matches_refresh_claim() {
    let (codec, _) = codec_with_clock();
    let grant = codec.mint_grant();
    let pair = codec.sign_grant(&TokenSubject::new(9, "carol"), &grant).unwrap();

    assert_ne!(grant.access_jti, grant.refresh_jti);
    assert_eq!(pair.access.jti, grant.access_jti);
    assert_eq!(pair.refresh.jti, grant.refresh_jti);

    let refresh = codec.decode_token(&pair.refresh.token).unwrap();
    assert_eq!(refresh.expires_at(), Some(grant.refresh_expires_at));
    assert_eq!(grant.refresh_expires_at - grant.issued_at, Duration::days(7));
    assert_eq!(grant.access_expires_at - grant.issued_at, Duration::minutes(30));
}
