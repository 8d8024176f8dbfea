// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and token writes.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::{user_tokens, users};
use crate::error::PersistenceError;

/// Inserts a user and returns their new id.
///
/// The email must already be lowercased by the caller.
///
/// # Errors
///
/// Returns an error if the insert fails, including a constraint violation
/// if the email is already registered.
pub fn insert_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, PersistenceError> {
    let user_id: i64 = diesel::insert_into(users::table)
        .values((
            users::name.eq(name),
            users::email.eq(email),
            users::password_hash.eq(password_hash),
        ))
        .returning(users::user_id)
        .get_result::<i64>(conn)?;

    Ok(user_id)
}

/// Deletes a user. Orders, exceptions, and tokens cascade.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_user_row(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    Ok(deleted)
}

/// Inserts a bearer token and returns its new id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_token(
    conn: &mut SqliteConnection,
    token_value: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let token_id: i64 = diesel::insert_into(user_tokens::table)
        .values((
            user_tokens::token_value.eq(token_value),
            user_tokens::user_id.eq(user_id),
            user_tokens::expires_at.eq(expires_at),
        ))
        .returning(user_tokens::token_id)
        .get_result::<i64>(conn)?;

    Ok(token_id)
}

/// Deletes a token by its opaque value.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_token_row(
    conn: &mut SqliteConnection,
    token_value: &str,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(user_tokens::table)
        .filter(user_tokens::token_value.eq(token_value))
        .execute(conn)?;

    Ok(deleted)
}
