// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order, standing-order, and exception queries.
//!
//! All week parameters arrive pre-encoded as week-column text (the
//! canonical Monday date); the adapter converts via
//! `data_models::week_column` before calling in.

use diesel::prelude::*;
use diesel::SqliteConnection;
use cob_web_domain::{OrderDetail, StandingOrder, Week};

use crate::data_models::{
    ExceptionRecord, SingleOrderRecord, StandingOrderRecord, parse_week_column,
};
use crate::diesel_schema::{order_exceptions, single_orders, standing_orders, users};
use crate::error::PersistenceError;

type OrderRow = (i64, i64, String, String, String, String, String, String);

/// Finds the one-off order for a (user, week) pair.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_single_order(
    conn: &mut SqliteConnection,
    user_id: i64,
    week_start: &str,
) -> Result<Option<SingleOrderRecord>, PersistenceError> {
    let row: Option<OrderRow> = single_orders::table
        .filter(single_orders::user_id.eq(user_id))
        .filter(single_orders::week_start.eq(week_start))
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(SingleOrderRecord::from_row).transpose()
}

/// Finds a one-off order by its id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_single_order_by_id(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<SingleOrderRecord>, PersistenceError> {
    let row: Option<OrderRow> = single_orders::table
        .filter(single_orders::order_id.eq(order_id))
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(SingleOrderRecord::from_row).transpose()
}

/// Finds the exception for a (user, week) pair.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_exception(
    conn: &mut SqliteConnection,
    user_id: i64,
    week_start: &str,
) -> Result<Option<ExceptionRecord>, PersistenceError> {
    let row: Option<(i64, i64, String, String)> = order_exceptions::table
        .filter(order_exceptions::user_id.eq(user_id))
        .filter(order_exceptions::week_start.eq(week_start))
        .first::<(i64, i64, String, String)>(conn)
        .optional()?;

    row.map(|(exception_id, owner_id, week_start_text, created_at)| {
        Ok(ExceptionRecord {
            exception_id,
            user_id: owner_id,
            week: parse_week_column(&week_start_text)?,
            created_at,
        })
    })
    .transpose()
}

/// Finds an exception by its id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_exception_by_id(
    conn: &mut SqliteConnection,
    exception_id: i64,
) -> Result<Option<ExceptionRecord>, PersistenceError> {
    let row: Option<(i64, i64, String, String)> = order_exceptions::table
        .filter(order_exceptions::exception_id.eq(exception_id))
        .first::<(i64, i64, String, String)>(conn)
        .optional()?;

    row.map(|(id, owner_id, week_start_text, created_at)| {
        Ok(ExceptionRecord {
            exception_id: id,
            user_id: owner_id,
            week: parse_week_column(&week_start_text)?,
            created_at,
        })
    })
    .transpose()
}

/// Finds a user's standing order.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_standing_order(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<StandingOrderRecord>, PersistenceError> {
    let row: Option<OrderRow> = standing_orders::table
        .filter(standing_orders::user_id.eq(user_id))
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(StandingOrderRecord::from_row).transpose()
}

/// All one-off orders for a week, joined with the owning user's name.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn singles_for_week(
    conn: &mut SqliteConnection,
    week_start: &str,
) -> Result<Vec<(i64, String, OrderDetail)>, PersistenceError> {
    let rows: Vec<(i64, String, String, String, String)> = single_orders::table
        .inner_join(users::table)
        .filter(single_orders::week_start.eq(week_start))
        .select((
            single_orders::user_id,
            users::name,
            single_orders::filling,
            single_orders::bread,
            single_orders::sauce,
        ))
        .load::<(i64, String, String, String, String)>(conn)?;

    rows.into_iter()
        .map(|(user_id, name, filling, bread, sauce)| {
            Ok((user_id, name, OrderDetail::parse(&filling, &bread, &sauce)?))
        })
        .collect()
}

/// All standing orders in the system, joined with the owning user's name.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn all_standing_orders(
    conn: &mut SqliteConnection,
) -> Result<Vec<(i64, String, StandingOrder)>, PersistenceError> {
    let rows: Vec<(i64, String, String, String, String, String)> = standing_orders::table
        .inner_join(users::table)
        .select((
            standing_orders::user_id,
            users::name,
            standing_orders::start_week,
            standing_orders::filling,
            standing_orders::bread,
            standing_orders::sauce,
        ))
        .load::<(i64, String, String, String, String, String)>(conn)?;

    rows.into_iter()
        .map(|(user_id, name, start_week, filling, bread, sauce)| {
            Ok((
                user_id,
                name,
                StandingOrder {
                    detail: OrderDetail::parse(&filling, &bread, &sauce)?,
                    start_week: parse_week_column(&start_week)?,
                },
            ))
        })
        .collect()
}

/// User ids holding an exception for a week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn excepted_users_for_week(
    conn: &mut SqliteConnection,
    week_start: &str,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(order_exceptions::table
        .filter(order_exceptions::week_start.eq(week_start))
        .select(order_exceptions::user_id)
        .load::<i64>(conn)?)
}

/// One user's one-off orders with week columns in `[lower, upper]`.
///
/// ISO date text compares lexicographically in week order, so the range
/// filter is a plain between.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn singles_in_range(
    conn: &mut SqliteConnection,
    user_id: i64,
    lower: &str,
    upper: &str,
) -> Result<Vec<(Week, OrderDetail)>, PersistenceError> {
    let rows: Vec<(String, String, String, String)> = single_orders::table
        .filter(single_orders::user_id.eq(user_id))
        .filter(single_orders::week_start.ge(lower))
        .filter(single_orders::week_start.le(upper))
        .select((
            single_orders::week_start,
            single_orders::filling,
            single_orders::bread,
            single_orders::sauce,
        ))
        .load::<(String, String, String, String)>(conn)?;

    rows.into_iter()
        .map(|(week_start, filling, bread, sauce)| {
            Ok((
                parse_week_column(&week_start)?,
                OrderDetail::parse(&filling, &bread, &sauce)?,
            ))
        })
        .collect()
}

/// One user's exception weeks with week columns in `[lower, upper]`.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn exceptions_in_range(
    conn: &mut SqliteConnection,
    user_id: i64,
    lower: &str,
    upper: &str,
) -> Result<Vec<Week>, PersistenceError> {
    let rows: Vec<String> = order_exceptions::table
        .filter(order_exceptions::user_id.eq(user_id))
        .filter(order_exceptions::week_start.ge(lower))
        .filter(order_exceptions::week_start.le(upper))
        .select(order_exceptions::week_start)
        .load::<String>(conn)?;

    rows.iter().map(|text| parse_week_column(text)).collect()
}
