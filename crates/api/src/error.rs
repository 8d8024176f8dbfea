// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use cob_web_domain::DomainError;
use cob_web_persistence::error::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// API contract. Each variant maps to exactly one HTTP status at the
/// server boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A requested resource was not found.
    ///
    /// Also covers permission failures on id lookups, so that foreign ids
    /// do not leak existence.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with existing state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The week's order is intentionally suppressed by an exception.
    ///
    /// Distinct from not-found: the absence is deliberate and explainable.
    OrderExcepted {
        /// The excepted week, `YYYY-Www` form.
        week: String,
    },
    /// The supplied (week, year) pair does not resolve to a calendar date.
    UnrepresentableWeek {
        /// The week number.
        week: u8,
        /// The week-based year.
        year: i32,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::OrderExcepted { week } => {
                write!(f, "Order for week {week} is suppressed by an exception")
            }
            Self::UnrepresentableWeek { week, year } => {
                write!(f, "Week {week} of year {year} does not exist")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::UnrepresentableWeek { week, year } => {
            ApiError::UnrepresentableWeek { week, year }
        }
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("week"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::InvalidFilling(value) => ApiError::InvalidInput {
            field: String::from("filling"),
            message: format!("Unknown filling '{value}'"),
        },
        DomainError::InvalidBread(value) => ApiError::InvalidInput {
            field: String::from("bread"),
            message: format!("Unknown bread '{value}'"),
        },
        DomainError::InvalidSauce(value) => ApiError::InvalidInput {
            field: String::from("sauce"),
            message: format!("Unknown sauce '{value}'"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations become conflicts, misses become not-found, and
/// everything else is an internal error; database detail never leaks to
/// clients beyond its message text.
#[must_use]
pub fn translate_persistence_error(resource_type: &str, err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from(resource_type),
            message,
        },
        PersistenceError::ConstraintViolation(message) => ApiError::Conflict { message },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
