// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order, standing-order, and exception writes.

use cob_web_domain::OrderDetail;
use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::diesel_schema::{order_exceptions, single_orders, standing_orders};
use crate::error::PersistenceError;

/// Inserts a one-off order and returns its new id.
///
/// # Errors
///
/// Returns an error if the insert fails, including a constraint violation
/// if the (user, week) pair already holds an order.
pub fn insert_single_order(
    conn: &mut SqliteConnection,
    user_id: i64,
    week_start: &str,
    detail: OrderDetail,
) -> Result<i64, PersistenceError> {
    let order_id: i64 = diesel::insert_into(single_orders::table)
        .values((
            single_orders::user_id.eq(user_id),
            single_orders::week_start.eq(week_start),
            single_orders::filling.eq(detail.filling.as_str()),
            single_orders::bread.eq(detail.bread.as_str()),
            single_orders::sauce.eq(detail.sauce.as_str()),
        ))
        .returning(single_orders::order_id)
        .get_result::<i64>(conn)?;

    Ok(order_id)
}

/// Replaces the contents of an existing one-off order.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_single_order_detail(
    conn: &mut SqliteConnection,
    order_id: i64,
    detail: OrderDetail,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(single_orders::table)
        .filter(single_orders::order_id.eq(order_id))
        .set((
            single_orders::filling.eq(detail.filling.as_str()),
            single_orders::bread.eq(detail.bread.as_str()),
            single_orders::sauce.eq(detail.sauce.as_str()),
            single_orders::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    Ok(updated)
}

/// Deletes a one-off order row by id.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_single_order_row(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(single_orders::table)
        .filter(single_orders::order_id.eq(order_id))
        .execute(conn)?;

    Ok(deleted)
}

/// Inserts a standing order and returns its new id.
///
/// # Errors
///
/// Returns an error if the insert fails, including a constraint violation
/// if the user already holds a standing order.
pub fn insert_standing_order(
    conn: &mut SqliteConnection,
    user_id: i64,
    start_week: &str,
    detail: OrderDetail,
) -> Result<i64, PersistenceError> {
    let order_id: i64 = diesel::insert_into(standing_orders::table)
        .values((
            standing_orders::user_id.eq(user_id),
            standing_orders::start_week.eq(start_week),
            standing_orders::filling.eq(detail.filling.as_str()),
            standing_orders::bread.eq(detail.bread.as_str()),
            standing_orders::sauce.eq(detail.sauce.as_str()),
        ))
        .returning(standing_orders::order_id)
        .get_result::<i64>(conn)?;

    Ok(order_id)
}

/// Replaces the contents and start week of an existing standing order.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_standing_order(
    conn: &mut SqliteConnection,
    order_id: i64,
    start_week: &str,
    detail: OrderDetail,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(standing_orders::table)
        .filter(standing_orders::order_id.eq(order_id))
        .set((
            standing_orders::start_week.eq(start_week),
            standing_orders::filling.eq(detail.filling.as_str()),
            standing_orders::bread.eq(detail.bread.as_str()),
            standing_orders::sauce.eq(detail.sauce.as_str()),
            standing_orders::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    Ok(updated)
}

/// Deletes a user's standing order.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_standing_order_row(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(standing_orders::table)
        .filter(standing_orders::user_id.eq(user_id))
        .execute(conn)?;

    Ok(deleted)
}

/// Inserts an exception and returns its new id.
///
/// # Errors
///
/// Returns an error if the insert fails, including a constraint violation
/// if the (user, week) pair already holds an exception.
pub fn insert_exception(
    conn: &mut SqliteConnection,
    user_id: i64,
    week_start: &str,
) -> Result<i64, PersistenceError> {
    let exception_id: i64 = diesel::insert_into(order_exceptions::table)
        .values((
            order_exceptions::user_id.eq(user_id),
            order_exceptions::week_start.eq(week_start),
        ))
        .returning(order_exceptions::exception_id)
        .get_result::<i64>(conn)?;

    Ok(exception_id)
}

/// Deletes an exception row by id.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_exception_row(
    conn: &mut SqliteConnection,
    exception_id: i64,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(order_exceptions::table)
        .filter(order_exceptions::exception_id.eq(exception_id))
        .execute(conn)?;

    Ok(deleted)
}
