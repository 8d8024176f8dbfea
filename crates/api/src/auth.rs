// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signup, login, and bearer-token authentication.

use time::{Duration, OffsetDateTime};
use tracing::info;

use cob_web_persistence::Persistence;
use cob_web_persistence::data_models::{TokenRecord, UserRecord};
use cob_web_persistence::error::PersistenceError;

use crate::error::{ApiError, AuthError};
use crate::request_response::SignupRequest;

/// Minimum display-name length.
const MIN_NAME_LENGTH: usize = 3;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service: signup, login, token validation, logout.
pub struct AuthenticationService;

impl AuthenticationService {
    /// How long an issued bearer token stays valid.
    const TOKEN_EXPIRATION: Duration = Duration::seconds(3600);

    /// Registers a new user.
    ///
    /// Validates the name, email, and password, normalises the email to
    /// lowercase, and stores a bcrypt hash of the password.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields and a conflict if
    /// the email is already registered.
    pub fn signup(
        persistence: &mut Persistence,
        request: &SignupRequest,
    ) -> Result<UserRecord, ApiError> {
        validate_name(&request.name)?;
        let email: String = validate_email(&request.email)?;
        validate_password(&request.password, &request.confirm_password)?;

        let password_hash: String = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to hash password: {e}"),
            })?;

        let user: UserRecord = persistence
            .create_user(&request.name, &email, &password_hash)
            .map_err(|e| match e {
                PersistenceError::ConstraintViolation(_) => ApiError::Conflict {
                    message: String::from("A user with this email already exists"),
                },
                other => ApiError::Internal {
                    message: other.to_string(),
                },
            })?;

        info!(user_id = user.user_id, "Registered new user");
        Ok(user)
    }

    /// Authenticates by name or email plus password and issues a token.
    ///
    /// # Errors
    ///
    /// Returns an authentication failure for unknown logins or wrong
    /// passwords; the two are not distinguished in the reason text.
    pub fn login(
        persistence: &mut Persistence,
        login: &str,
        password: &str,
    ) -> Result<(TokenRecord, UserRecord), AuthError> {
        let user: UserRecord = persistence
            .get_user_by_login(login)
            .map_err(map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Unknown user or wrong password"),
            })?;

        let verified: bool =
            bcrypt::verify(password, &user.password_hash).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Password verification failed: {e}"),
                }
            })?;
        if !verified {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Unknown user or wrong password"),
            });
        }

        let token_value: String = generate_token();
        let expires_at: OffsetDateTime = OffsetDateTime::now_utc() + Self::TOKEN_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        let token: TokenRecord = persistence
            .create_token(&token_value, user.user_id, &expires_at_str)
            .map_err(map_persistence_error)?;

        info!(user_id = user.user_id, "User logged in");
        Ok((token, user))
    }

    /// Validates a bearer token and returns the owning user.
    ///
    /// # Errors
    ///
    /// Returns an authentication failure if the token is unknown, expired,
    /// or orphaned.
    pub fn validate_token(
        persistence: &mut Persistence,
        token_value: &str,
    ) -> Result<UserRecord, AuthError> {
        let token: TokenRecord = persistence
            .get_token(token_value)
            .map_err(map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &token.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse token expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Token expired"),
            });
        }

        persistence
            .get_user_by_id(token.user_id)
            .map_err(map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Token owner no longer exists"),
            })
    }

    /// Logs out by deleting the token. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error only if the delete itself fails.
    pub fn logout(persistence: &mut Persistence, token_value: &str) -> Result<(), AuthError> {
        persistence
            .delete_token(token_value)
            .map_err(map_persistence_error)
    }
}

/// Checks the display-name rules: at least three characters, alphanumeric.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: format!("Name must be at least {MIN_NAME_LENGTH} characters"),
        });
    }
    if !name.chars().all(char::is_alphanumeric) {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Name must be alphanumeric"),
        });
    }
    Ok(())
}

/// Checks the email shape and returns the lowercased form.
///
/// Shape only: one `@` with a dotted domain after it. Deliverability is
/// not our problem.
fn validate_email(email: &str) -> Result<String, ApiError> {
    let malformed = || ApiError::InvalidInput {
        field: String::from("email"),
        message: String::from("Invalid email address"),
    };

    let (local, domain): (&str, &str) = email.split_once('@').ok_or_else(malformed)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(malformed());
    }
    let (host, tld): (&str, &str) = domain.rsplit_once('.').ok_or_else(malformed)?;
    if host.is_empty() || tld.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(malformed());
    }

    Ok(email.to_lowercase())
}

/// Checks the password rules: minimum length and confirmation match.
fn validate_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        });
    }
    if password != confirm {
        return Err(ApiError::InvalidInput {
            field: String::from("confirm_password"),
            message: String::from("Passwords do not match"),
        });
    }
    Ok(())
}

/// Generates an opaque bearer token value.
fn generate_token() -> String {
    format!(
        "{:016x}{:016x}{:016x}{:016x}",
        rand::random::<u64>(),
        rand::random::<u64>(),
        rand::random::<u64>(),
        rand::random::<u64>()
    )
}

/// Maps persistence errors to authentication failures.
fn map_persistence_error(err: PersistenceError) -> AuthError {
    AuthError::AuthenticationFailed {
        reason: format!("Database error: {err}"),
    }
}
