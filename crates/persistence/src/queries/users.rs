// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and token queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{TokenRecord, UserRecord};
use crate::diesel_schema::{user_tokens, users};
use crate::error::PersistenceError;

/// Finds a user whose name or lowercased email matches the login value.
///
/// Emails are stored lowercased, so the caller should lowercase the value
/// before matching on email; names match exactly.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_user_by_login(
    conn: &mut SqliteConnection,
    login: &str,
) -> Result<Option<UserRecord>, PersistenceError> {
    let lowered: String = login.to_lowercase();
    let row: Option<(i64, String, String, String, String)> = users::table
        .filter(users::name.eq(login).or(users::email.eq(&lowered)))
        .first::<(i64, String, String, String, String)>(conn)
        .optional()?;

    Ok(row.map(|(user_id, name, email, password_hash, created_at)| UserRecord {
        user_id,
        name,
        email,
        password_hash,
        created_at,
    }))
}

/// Finds a user by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserRecord>, PersistenceError> {
    let row: Option<(i64, String, String, String, String)> = users::table
        .filter(users::user_id.eq(user_id))
        .first::<(i64, String, String, String, String)>(conn)
        .optional()?;

    Ok(row.map(|(id, name, email, password_hash, created_at)| UserRecord {
        user_id: id,
        name,
        email,
        password_hash,
        created_at,
    }))
}

/// Finds a token by its opaque value.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_token(
    conn: &mut SqliteConnection,
    token_value: &str,
) -> Result<Option<TokenRecord>, PersistenceError> {
    let row: Option<(i64, String, i64, String)> = user_tokens::table
        .filter(user_tokens::token_value.eq(token_value))
        .select((
            user_tokens::token_id,
            user_tokens::token_value,
            user_tokens::user_id,
            user_tokens::expires_at,
        ))
        .first::<(i64, String, i64, String)>(conn)
        .optional()?;

    Ok(row.map(|(token_id, value, user_id, expires_at)| TokenRecord {
        token_id,
        token_value: value,
        user_id,
        expires_at,
    }))
}
