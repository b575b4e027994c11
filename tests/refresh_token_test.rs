// Refresh token lifecycle against a migrated database: issuance defaults,
// token-value uniqueness, soft revocation, and retention cleanup.

mod common;

use chrono::{Duration, Utc};

use pedidos_migrations::models::{RefreshToken, RefreshTokenError};

#[test]
fn test_new_token_defaults() {
    let mut conn = common::migrated_connection();
    let user = common::insert_user(&mut conn, "login@example.com");

    let expires = Utc::now().naive_utc() + Duration::days(7);
    let token = RefreshToken::store(&mut conn, user.id, "tok-fresh", expires).unwrap();

    // is_revoked defaults to false, created_at is filled by the schema.
    assert!(!token.is_revoked);
    assert!(token.is_active());
    assert_eq!(token.user_id, user.id);
}

#[test]
fn test_token_value_is_unique() {
    let mut conn = common::migrated_connection();
    let user_a = common::insert_user(&mut conn, "a@example.com");
    let user_b = common::insert_user(&mut conn, "b@example.com");

    let expires = Utc::now().naive_utc() + Duration::days(7);
    RefreshToken::store(&mut conn, user_a.id, "tok-shared", expires).unwrap();

    // Same value, even for a different user, must violate uniqueness.
    let err = RefreshToken::store(&mut conn, user_b.id, "tok-shared", expires).unwrap_err();
    assert!(matches!(err, RefreshTokenError::Duplicate));
}

#[test]
fn test_revocation_is_soft() {
    let mut conn = common::migrated_connection();
    let user = common::insert_user(&mut conn, "logout@example.com");

    let expires = Utc::now().naive_utc() + Duration::days(7);
    RefreshToken::store(&mut conn, user.id, "tok-session", expires).unwrap();

    assert!(RefreshToken::revoke(&mut conn, "tok-session").unwrap());

    // The row is still there and still findable by value.
    let revoked = RefreshToken::find_by_token(&mut conn, "tok-session").unwrap();
    assert!(revoked.is_revoked);
    assert!(!revoked.is_active());

    // Using it must be rejected as revoked, not missing.
    let err = RefreshToken::validate(&mut conn, "tok-session").unwrap_err();
    assert!(matches!(err, RefreshTokenError::Revoked));

    // Revoking again is a no-op.
    assert!(!RefreshToken::revoke(&mut conn, "tok-session").unwrap());
}

#[test]
fn test_expired_token_rejected() {
    let mut conn = common::migrated_connection();
    let user = common::insert_user(&mut conn, "stale@example.com");

    let expired = Utc::now().naive_utc() - Duration::hours(1);
    RefreshToken::store(&mut conn, user.id, "tok-stale", expired).unwrap();

    let err = RefreshToken::validate(&mut conn, "tok-stale").unwrap_err();
    assert!(matches!(err, RefreshTokenError::Expired));
}

#[test]
fn test_unknown_token_not_found() {
    let mut conn = common::migrated_connection();

    let err = RefreshToken::validate(&mut conn, "tok-never-issued").unwrap_err();
    assert!(matches!(err, RefreshTokenError::NotFound));
}

#[test]
fn test_revoke_all_for_user() {
    let mut conn = common::migrated_connection();
    let user = common::insert_user(&mut conn, "everywhere@example.com");
    let other = common::insert_user(&mut conn, "bystander@example.com");

    let expires = Utc::now().naive_utc() + Duration::days(7);
    RefreshToken::store(&mut conn, user.id, "tok-phone", expires).unwrap();
    RefreshToken::store(&mut conn, user.id, "tok-laptop", expires).unwrap();
    RefreshToken::store(&mut conn, other.id, "tok-other", expires).unwrap();

    let revoked = RefreshToken::revoke_all_for_user(&mut conn, user.id).unwrap();
    assert_eq!(revoked, 2);

    assert_eq!(RefreshToken::count_active_for_user(&mut conn, user.id).unwrap(), 0);
    assert_eq!(RefreshToken::count_active_for_user(&mut conn, other.id).unwrap(), 1);
}

#[test]
fn test_cleanup_removes_expired_and_revoked() {
    let mut conn = common::migrated_connection();
    let user = common::insert_user(&mut conn, "cleanup@example.com");

    let live = Utc::now().naive_utc() + Duration::days(7);
    let dead = Utc::now().naive_utc() - Duration::days(1);

    RefreshToken::store(&mut conn, user.id, "tok-live", live).unwrap();
    RefreshToken::store(&mut conn, user.id, "tok-expired", dead).unwrap();
    RefreshToken::store(&mut conn, user.id, "tok-revoked", live).unwrap();
    RefreshToken::revoke(&mut conn, "tok-revoked").unwrap();

    let removed = RefreshToken::cleanup_expired(&mut conn).unwrap();
    assert_eq!(removed, 2);

    assert!(RefreshToken::find_by_token(&mut conn, "tok-live").is_ok());
    assert!(matches!(
        RefreshToken::find_by_token(&mut conn, "tok-expired").unwrap_err(),
        RefreshTokenError::NotFound
    ));
}
