// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signup, login, and token lifecycle tests.

use super::helpers::{signup_user, test_persistence};
use crate::auth::AuthenticationService;
use crate::error::{ApiError, AuthError};
use crate::request_response::SignupRequest;

fn valid_signup() -> SignupRequest {
    SignupRequest {
        name: String::from("alice"),
        email: String::from("alice@example.com"),
        password: String::from("longenough"),
        confirm_password: String::from("longenough"),
    }
}

#[test]
fn test_signup_succeeds_and_lowercases_email() {
    let mut persistence = test_persistence();
    let request = SignupRequest {
        email: String::from("Alice@Example.COM"),
        ..valid_signup()
    };

    let user = AuthenticationService::signup(&mut persistence, &request)
        .expect("Signup should succeed");

    assert_eq!(user.name, "alice");
    assert_eq!(user.email, "alice@example.com");
}

#[test]
fn test_signup_rejects_short_name() {
    let mut persistence = test_persistence();
    let request = SignupRequest {
        name: String::from("al"),
        ..valid_signup()
    };

    let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "name"));
}

#[test]
fn test_signup_rejects_non_alphanumeric_name() {
    let mut persistence = test_persistence();
    let request = SignupRequest {
        name: String::from("al ice!"),
        ..valid_signup()
    };

    let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "name"));
}

#[test]
fn test_signup_rejects_malformed_emails() {
    let mut persistence = test_persistence();
    for bad in ["no-at-sign.com", "@example.com", "alice@", "alice@nodot", "a b@example.com"] {
        let request = SignupRequest {
            email: String::from(bad),
            ..valid_signup()
        };
        let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
        assert!(
            matches!(err, ApiError::InvalidInput { ref field, .. } if field == "email"),
            "Expected email rejection for '{bad}'"
        );
    }
}

#[test]
fn test_signup_rejects_short_password() {
    let mut persistence = test_persistence();
    let request = SignupRequest {
        password: String::from("short"),
        confirm_password: String::from("short"),
        ..valid_signup()
    };

    let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "password"));
}

#[test]
fn test_signup_rejects_mismatched_confirmation() {
    let mut persistence = test_persistence();
    let request = SignupRequest {
        confirm_password: String::from("different-pass"),
        ..valid_signup()
    };

    let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
    assert!(
        matches!(err, ApiError::InvalidInput { ref field, .. } if field == "confirm_password")
    );
}

#[test]
fn test_signup_duplicate_email_is_conflict() {
    let mut persistence = test_persistence();
    AuthenticationService::signup(&mut persistence, &valid_signup())
        .expect("First signup should succeed");

    let request = SignupRequest {
        name: String::from("alice2"),
        ..valid_signup()
    };
    let err = AuthenticationService::signup(&mut persistence, &request).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_login_by_name_and_by_email() {
    let mut persistence = test_persistence();
    AuthenticationService::signup(&mut persistence, &valid_signup())
        .expect("Signup should succeed");

    let (_, by_name) = AuthenticationService::login(&mut persistence, "alice", "longenough")
        .expect("Login by name should succeed");
    assert_eq!(by_name.name, "alice");

    let (_, by_email) =
        AuthenticationService::login(&mut persistence, "Alice@Example.COM", "longenough")
            .expect("Login by email should be case-insensitive");
    assert_eq!(by_email.user_id, by_name.user_id);
}

#[test]
fn test_login_rejects_wrong_password_and_unknown_user() {
    let mut persistence = test_persistence();
    AuthenticationService::signup(&mut persistence, &valid_signup())
        .expect("Signup should succeed");

    let wrong = AuthenticationService::login(&mut persistence, "alice", "wrong-password");
    assert!(matches!(
        wrong,
        Err(AuthError::AuthenticationFailed { .. })
    ));

    let unknown = AuthenticationService::login(&mut persistence, "bob", "longenough");
    assert!(matches!(
        unknown,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_token_validates_until_logged_out() {
    let mut persistence = test_persistence();
    AuthenticationService::signup(&mut persistence, &valid_signup())
        .expect("Signup should succeed");

    let (token, user) = AuthenticationService::login(&mut persistence, "alice", "longenough")
        .expect("Login should succeed");

    let validated = AuthenticationService::validate_token(&mut persistence, &token.token_value)
        .expect("Token should validate");
    assert_eq!(validated.user_id, user.user_id);

    AuthenticationService::logout(&mut persistence, &token.token_value)
        .expect("Logout should succeed");

    let after = AuthenticationService::validate_token(&mut persistence, &token.token_value);
    assert!(matches!(
        after,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let mut persistence = test_persistence();
    let user = signup_user(&mut persistence, "alice", "alice@example.com");

    // Store a token whose expiry is already in the past.
    persistence
        .create_token("stale-token", user.user_id, "2020-01-01T00:00:00.000000000Z")
        .expect("Failed to create token");

    let result = AuthenticationService::validate_token(&mut persistence, "stale-token");
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_unknown_token_is_rejected() {
    let mut persistence = test_persistence();

    let result = AuthenticationService::validate_token(&mut persistence, "no-such-token");
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}
