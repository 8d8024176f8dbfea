// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the cob order tracker.
//!
//! This crate stores users, bearer tokens, one-off orders, standing
//! orders, and per-week exceptions in `SQLite` via Diesel. The
//! [`Persistence`] adapter is the only public surface; it composes the
//! query and mutation functions into transactions so that callers always
//! observe consistent snapshots.
//!
//! Week identity is stored as the canonical Monday of the ISO week in
//! `YYYY-MM-DD` text. ISO date text sorts lexicographically in week
//! order, which keeps history range scans to a plain between filter.
//!
//! ## Testing
//!
//! Standard tests run against unique in-memory `SQLite` databases. Each
//! [`Persistence::new_in_memory`] call receives its own database via an
//! atomic counter, so tests are isolated without time-based collisions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use cob_web_domain::{OrderDetail, ResolvedOrder, StandingOrder, Week, resolve};
use diesel::prelude::*;
use diesel::SqliteConnection;

pub mod data_models;
pub mod error;
pub mod sqlite;

pub(crate) mod diesel_schema;
pub(crate) mod mutations;
pub(crate) mod queries;

#[cfg(test)]
mod tests;

use data_models::{
    ExceptionRecord, HistoryRows, OrderSnapshot, SingleDeleteOutcome, SingleOrderRecord,
    StandingOrderRecord, TokenRecord, UserRecord, WeekAggregateRows, week_column,
};
use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Encodes a week's canonical Monday as week-column text.
fn week_text(week: Week) -> Result<String, PersistenceError> {
    let monday: time::Date = week.start_date()?;
    week_column(monday)
}

/// The persistence adapter.
///
/// Owns a single `SQLite` connection. Multi-step operations run inside
/// Diesel transactions.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Create a unique shared in-memory database name per call so tests are isolated.
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // WAL improves read concurrency for file-backed databases.
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Users and tokens
    // ------------------------------------------------------------------

    /// Creates a user and returns the stored record.
    ///
    /// The caller supplies an already-lowercased email and an
    /// already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the email is already registered.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, PersistenceError> {
        self.conn
            .transaction::<UserRecord, PersistenceError, _>(|conn| {
                let user_id: i64 = mutations::users::insert_user(conn, name, email, password_hash)?;
                queries::users::find_user_by_id(conn, user_id)?.ok_or_else(|| {
                    PersistenceError::Other(String::from("Inserted user row missing on reload"))
                })
            })
    }

    /// Finds a user whose name or email matches the login value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_login(
        &mut self,
        login: &str,
    ) -> Result<Option<UserRecord>, PersistenceError> {
        queries::users::find_user_by_login(&mut self.conn, login)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserRecord>, PersistenceError> {
        queries::users::find_user_by_id(&mut self.conn, user_id)
    }

    /// Deletes a user. Their orders, exceptions, and tokens cascade.
    ///
    /// # Errors
    ///
    /// Returns not-found if no such user exists.
    pub fn delete_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        let deleted: usize = mutations::users::delete_user_row(&mut self.conn, user_id)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(String::from("User not found")));
        }
        Ok(())
    }

    /// Stores a bearer token and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_token(
        &mut self,
        token_value: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<TokenRecord, PersistenceError> {
        self.conn
            .transaction::<TokenRecord, PersistenceError, _>(|conn| {
                mutations::users::insert_token(conn, token_value, user_id, expires_at)?;
                queries::users::find_token(conn, token_value)?.ok_or_else(|| {
                    PersistenceError::Other(String::from("Inserted token row missing on reload"))
                })
            })
    }

    /// Finds a token by its opaque value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_token(
        &mut self,
        token_value: &str,
    ) -> Result<Option<TokenRecord>, PersistenceError> {
        queries::users::find_token(&mut self.conn, token_value)
    }

    /// Deletes a token. Deleting an already-absent token is not an error,
    /// so logout stays idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_token(&mut self, token_value: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_token_row(&mut self.conn, token_value)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Single (one-off) orders
    // ------------------------------------------------------------------

    /// Reads everything needed to resolve one (user, week) pair in a
    /// single consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn order_snapshot(
        &mut self,
        user_id: i64,
        week: Week,
    ) -> Result<OrderSnapshot, PersistenceError> {
        let week_start: String = week_text(week)?;
        self.conn
            .transaction::<OrderSnapshot, PersistenceError, _>(|conn| {
                let single: Option<SingleOrderRecord> =
                    queries::orders::find_single_order(conn, user_id, &week_start)?;
                let excepted: bool =
                    queries::orders::find_exception(conn, user_id, &week_start)?.is_some();
                let standing: Option<StandingOrderRecord> =
                    queries::orders::find_standing_order(conn, user_id)?;

                Ok(OrderSnapshot {
                    single,
                    excepted,
                    standing,
                })
            })
    }

    /// Creates or replaces the one-off order for a (user, week) pair.
    ///
    /// Returns the stored record and whether a new row was created
    /// (`false` means an existing order was replaced).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_single_order(
        &mut self,
        user_id: i64,
        week: Week,
        detail: OrderDetail,
    ) -> Result<(SingleOrderRecord, bool), PersistenceError> {
        let week_start: String = week_text(week)?;
        self.conn
            .transaction::<(SingleOrderRecord, bool), PersistenceError, _>(|conn| {
                let existing: Option<SingleOrderRecord> =
                    queries::orders::find_single_order(conn, user_id, &week_start)?;

                let (order_id, created): (i64, bool) = match existing {
                    Some(record) => {
                        mutations::orders::update_single_order_detail(conn, record.order_id, detail)?;
                        (record.order_id, false)
                    }
                    None => (
                        mutations::orders::insert_single_order(conn, user_id, &week_start, detail)?,
                        true,
                    ),
                };

                let stored: SingleOrderRecord =
                    queries::orders::find_single_order_by_id(conn, order_id)?.ok_or_else(|| {
                        PersistenceError::Other(String::from(
                            "Inserted order row missing on reload",
                        ))
                    })?;

                Ok((stored, created))
            })
    }

    /// Removes a user's order for a week, following resolution precedence.
    ///
    /// If the week resolves to a one-off order, that row is deleted. If it
    /// resolves to the standing order, an exception is recorded for the
    /// week instead and the standing order is left untouched. If the week
    /// resolves to nothing (absent or already excepted), this is not-found.
    ///
    /// # Errors
    ///
    /// Returns not-found when there is no order to remove, or an error if
    /// a read or write fails.
    pub fn delete_single_order(
        &mut self,
        user_id: i64,
        week: Week,
    ) -> Result<SingleDeleteOutcome, PersistenceError> {
        let week_start: String = week_text(week)?;
        self.conn
            .transaction::<SingleDeleteOutcome, PersistenceError, _>(|conn| {
                let single: Option<SingleOrderRecord> =
                    queries::orders::find_single_order(conn, user_id, &week_start)?;
                let excepted: bool =
                    queries::orders::find_exception(conn, user_id, &week_start)?.is_some();
                let standing: Option<StandingOrder> =
                    queries::orders::find_standing_order(conn, user_id)?
                        .map(|record| record.to_standing());

                let resolved: ResolvedOrder = resolve(
                    single.as_ref().map(|record| record.detail),
                    excepted,
                    standing.as_ref(),
                    week,
                );

                match resolved {
                    ResolvedOrder::Single(_) => {
                        if let Some(record) = single {
                            mutations::orders::delete_single_order_row(conn, record.order_id)?;
                        }
                        Ok(SingleDeleteOutcome::OrderDeleted)
                    }
                    ResolvedOrder::Recurring(_) => {
                        mutations::orders::insert_exception(conn, user_id, &week_start)?;
                        Ok(SingleDeleteOutcome::ExceptionRecorded)
                    }
                    ResolvedOrder::Excepted | ResolvedOrder::Absent => Err(
                        PersistenceError::NotFound(String::from("No order for this week")),
                    ),
                }
            })
    }

    /// Deletes a one-off order by id, checking ownership.
    ///
    /// # Errors
    ///
    /// Returns not-found if the order does not exist or belongs to a
    /// different user.
    pub fn delete_single_order_by_id(
        &mut self,
        user_id: i64,
        order_id: i64,
    ) -> Result<(), PersistenceError> {
        self.conn.transaction::<(), PersistenceError, _>(|conn| {
            let existing: Option<SingleOrderRecord> =
                queries::orders::find_single_order_by_id(conn, order_id)?;

            match existing {
                Some(record) if record.user_id == user_id => {
                    mutations::orders::delete_single_order_row(conn, order_id)?;
                    Ok(())
                }
                // Ownership failures are indistinguishable from misses.
                _ => Err(PersistenceError::NotFound(String::from("Order not found"))),
            }
        })
    }

    // ------------------------------------------------------------------
    // Standing (recurring) orders
    // ------------------------------------------------------------------

    /// Finds a user's standing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_standing_order(
        &mut self,
        user_id: i64,
    ) -> Result<Option<StandingOrderRecord>, PersistenceError> {
        queries::orders::find_standing_order(&mut self.conn, user_id)
    }

    /// Creates or replaces a user's standing order.
    ///
    /// Returns the stored record and whether a new row was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_standing_order(
        &mut self,
        user_id: i64,
        start_week: Week,
        detail: OrderDetail,
    ) -> Result<(StandingOrderRecord, bool), PersistenceError> {
        let start_text: String = week_text(start_week)?;
        self.conn
            .transaction::<(StandingOrderRecord, bool), PersistenceError, _>(|conn| {
                let existing: Option<StandingOrderRecord> =
                    queries::orders::find_standing_order(conn, user_id)?;

                let created: bool = match existing {
                    Some(record) => {
                        mutations::orders::update_standing_order(
                            conn,
                            record.order_id,
                            &start_text,
                            detail,
                        )?;
                        false
                    }
                    None => {
                        mutations::orders::insert_standing_order(
                            conn, user_id, &start_text, detail,
                        )?;
                        true
                    }
                };

                let stored: StandingOrderRecord =
                    queries::orders::find_standing_order(conn, user_id)?.ok_or_else(|| {
                        PersistenceError::Other(String::from(
                            "Inserted standing order row missing on reload",
                        ))
                    })?;

                Ok((stored, created))
            })
    }

    /// Deletes a user's standing order. Per-week exceptions are left in
    /// place; they are inert without a standing order.
    ///
    /// # Errors
    ///
    /// Returns not-found if the user has no standing order.
    pub fn delete_standing_order(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        let deleted: usize = mutations::orders::delete_standing_order_row(&mut self.conn, user_id)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(String::from(
                "No recurring order to delete",
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Exceptions
    // ------------------------------------------------------------------

    /// Records an exception for a (user, week) pair.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if an exception already exists for
    /// the pair. The UNIQUE index backstops this pre-check against racing
    /// writers.
    pub fn create_exception(
        &mut self,
        user_id: i64,
        week: Week,
    ) -> Result<ExceptionRecord, PersistenceError> {
        let week_start: String = week_text(week)?;
        self.conn
            .transaction::<ExceptionRecord, PersistenceError, _>(|conn| {
                if queries::orders::find_exception(conn, user_id, &week_start)?.is_some() {
                    return Err(PersistenceError::ConstraintViolation(String::from(
                        "An exception already exists for this week",
                    )));
                }

                let exception_id: i64 =
                    mutations::orders::insert_exception(conn, user_id, &week_start)?;
                queries::orders::find_exception_by_id(conn, exception_id)?.ok_or_else(|| {
                    PersistenceError::Other(String::from(
                        "Inserted exception row missing on reload",
                    ))
                })
            })
    }

    /// Deletes an exception by id, checking ownership.
    ///
    /// # Errors
    ///
    /// Returns not-found if the exception does not exist or belongs to a
    /// different user.
    pub fn delete_exception(
        &mut self,
        user_id: i64,
        exception_id: i64,
    ) -> Result<(), PersistenceError> {
        self.conn.transaction::<(), PersistenceError, _>(|conn| {
            let existing: Option<ExceptionRecord> =
                queries::orders::find_exception_by_id(conn, exception_id)?;

            match existing {
                Some(record) if record.user_id == user_id => {
                    mutations::orders::delete_exception_row(conn, exception_id)?;
                    Ok(())
                }
                // Ownership failures are indistinguishable from misses.
                _ => Err(PersistenceError::NotFound(String::from(
                    "Exception not found",
                ))),
            }
        })
    }

    // ------------------------------------------------------------------
    // Aggregation and history
    // ------------------------------------------------------------------

    /// Reads everything needed to aggregate one week across all users in
    /// a single consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn week_aggregate_rows(
        &mut self,
        week: Week,
    ) -> Result<WeekAggregateRows, PersistenceError> {
        let week_start: String = week_text(week)?;
        self.conn
            .transaction::<WeekAggregateRows, PersistenceError, _>(|conn| {
                Ok(WeekAggregateRows {
                    singles: queries::orders::singles_for_week(conn, &week_start)?,
                    standing: queries::orders::all_standing_orders(conn)?,
                    excepted: queries::orders::excepted_users_for_week(conn, &week_start)?,
                })
            })
    }

    /// Reads one user's records falling inside the inclusive week window
    /// `[oldest, newest]`.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    pub fn history_window(
        &mut self,
        user_id: i64,
        oldest: Week,
        newest: Week,
    ) -> Result<HistoryRows, PersistenceError> {
        let lower: String = week_text(oldest)?;
        let upper: String = week_text(newest)?;
        self.conn
            .transaction::<HistoryRows, PersistenceError, _>(|conn| {
                Ok(HistoryRows {
                    singles: queries::orders::singles_in_range(conn, user_id, &lower, &upper)?,
                    exceptions: queries::orders::exceptions_in_range(
                        conn, user_id, &lower, &upper,
                    )?,
                    standing: queries::orders::find_standing_order(conn, user_id)?
                        .map(|record| record.to_standing()),
                })
            })
    }
}
