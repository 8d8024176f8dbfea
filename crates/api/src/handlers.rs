// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operation handlers for the order API.
//!
//! Each function implements one operation against the persistence adapter
//! and translates outcomes into wire DTOs. The HTTP layer is responsible
//! only for extraction and status mapping; all semantics live here.

use std::collections::BTreeMap;

use tracing::info;

use cob_web_domain::{
    Clock, OrderDetail, ResolvedOrder, StandingOrder, Week, aggregate_week, classify_history,
    history_weeks, resolve,
};
use cob_web_persistence::Persistence;
use cob_web_persistence::data_models::{
    HistoryRows, OrderSnapshot, SingleDeleteOutcome, StandingOrderRecord, WeekAggregateRows,
};

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    DeleteOrderQuery, ExceptionResponse, HistoryEntry, HistoryQuery, HistoryResponse,
    MessageResponse, OrderResponse, RecurringOrderRequest, RecurringOrderResponse,
    SingleOrderRequest, WeekOrdersEntry, WeekOrdersResponse, WeekQuery,
};

/// Weeks per history page.
const HISTORY_PAGE_SIZE: u32 = 10;

/// Resolves week selector parameters to a concrete week.
///
/// Both absent defaults to the current week; a full pair is validated for
/// representability; half a pair is rejected before anything else runs.
///
/// # Errors
///
/// Returns a validation error for a partial pair and an
/// unrepresentable-week error for a pair with no calendar date.
pub fn select_week(query: WeekQuery, clock: &dyn Clock) -> Result<Week, ApiError> {
    match (query.week, query.year) {
        (None, None) => Ok(Week::current(clock)),
        (Some(week), Some(year)) => {
            let selected: Week = Week::new(week, year);
            // Reject impossible pairs before touching the database.
            selected.start_date().map_err(translate_domain_error)?;
            Ok(selected)
        }
        _ => Err(ApiError::InvalidInput {
            field: String::from("week"),
            message: String::from("week and year must be supplied together"),
        }),
    }
}

/// Resolves the authenticated user's order for a week.
///
/// # Errors
///
/// Returns not-found when nothing applies and an order-excepted error
/// when an exception suppresses the standing order; the latter is
/// deliberate absence, not a miss.
pub fn get_my_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    query: WeekQuery,
) -> Result<OrderResponse, ApiError> {
    let week: Week = select_week(query, clock)?;
    let snapshot: OrderSnapshot = persistence
        .order_snapshot(user_id, week)
        .map_err(|e| translate_persistence_error("Order", e))?;

    let standing: Option<StandingOrder> = snapshot
        .standing
        .as_ref()
        .map(StandingOrderRecord::to_standing);
    let resolved: ResolvedOrder = resolve(
        snapshot.single.as_ref().map(|record| record.detail),
        snapshot.excepted,
        standing.as_ref(),
        week,
    );

    match resolved {
        ResolvedOrder::Single(detail) => Ok(OrderResponse::new(week, detail, false)),
        ResolvedOrder::Recurring(detail) => Ok(OrderResponse::new(week, detail, true)),
        ResolvedOrder::Excepted => Err(ApiError::OrderExcepted {
            week: week.to_string(),
        }),
        ResolvedOrder::Absent => Err(ApiError::ResourceNotFound {
            resource_type: String::from("Order"),
            message: format!("No order for week {week}"),
        }),
    }
}

/// Places or replaces the user's one-off order for a week.
///
/// # Errors
///
/// Returns an error if the week selector is invalid or the write fails.
pub fn post_my_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    query: WeekQuery,
    request: &SingleOrderRequest,
) -> Result<OrderResponse, ApiError> {
    let week: Week = select_week(query, clock)?;
    let detail: OrderDetail = OrderDetail::new(request.filling, request.bread, request.sauce);

    let (record, created) = persistence
        .upsert_single_order(user_id, week, detail)
        .map_err(|e| translate_persistence_error("Order", e))?;

    info!(user_id, week = %week, created, "Placed one-off order");
    Ok(OrderResponse::new(record.week, record.detail, false))
}

/// Removes the user's order for a week, or a specific order by id.
///
/// When the week resolves to the standing order, the delete records an
/// exception for that week instead of touching the standing order.
///
/// # Errors
///
/// Returns not-found when nothing applies, or a validation error for a
/// partial week selector.
pub fn delete_my_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    query: DeleteOrderQuery,
) -> Result<MessageResponse, ApiError> {
    if let Some(order_id) = query.id {
        persistence
            .delete_single_order_by_id(user_id, order_id)
            .map_err(|e| translate_persistence_error("Order", e))?;
        info!(user_id, order_id, "Deleted one-off order by id");
        return Ok(MessageResponse {
            message: String::from("Order deleted"),
        });
    }

    let week: Week = select_week(
        WeekQuery {
            week: query.week,
            year: query.year,
        },
        clock,
    )?;

    let outcome: SingleDeleteOutcome = persistence
        .delete_single_order(user_id, week)
        .map_err(|e| translate_persistence_error("Order", e))?;

    let message: String = match outcome {
        SingleDeleteOutcome::OrderDeleted => {
            info!(user_id, week = %week, "Deleted one-off order");
            String::from("Order deleted")
        }
        SingleDeleteOutcome::ExceptionRecorded => {
            info!(user_id, week = %week, "Excepted recurring order");
            String::from("Recurring order excepted for this week")
        }
    };

    Ok(MessageResponse { message })
}

/// Fetches the user's standing order.
///
/// # Errors
///
/// Returns not-found if the user has no standing order.
pub fn get_recurring_order(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<RecurringOrderResponse, ApiError> {
    let record: StandingOrderRecord = persistence
        .get_standing_order(user_id)
        .map_err(|e| translate_persistence_error("Recurring order", e))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Recurring order"),
            message: String::from("No recurring order"),
        })?;

    Ok(RecurringOrderResponse {
        start_week: record.start_week.week,
        start_year: record.start_week.year,
        filling: record.detail.filling,
        bread: record.detail.bread,
        sauce: record.detail.sauce,
    })
}

/// Creates or replaces the user's standing order.
///
/// The start week defaults to the current week when absent.
///
/// # Errors
///
/// Returns an error if the start-week selector is invalid or the write
/// fails.
pub fn post_recurring_order(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    request: &RecurringOrderRequest,
) -> Result<RecurringOrderResponse, ApiError> {
    let start_week: Week = select_week(
        WeekQuery {
            week: request.start_week,
            year: request.start_year,
        },
        clock,
    )?;
    let detail: OrderDetail = OrderDetail::new(request.filling, request.bread, request.sauce);

    let (record, created) = persistence
        .upsert_standing_order(user_id, start_week, detail)
        .map_err(|e| translate_persistence_error("Recurring order", e))?;

    info!(user_id, start_week = %start_week, created, "Placed recurring order");
    Ok(RecurringOrderResponse {
        start_week: record.start_week.week,
        start_year: record.start_week.year,
        filling: record.detail.filling,
        bread: record.detail.bread,
        sauce: record.detail.sauce,
    })
}

/// Deletes the user's standing order. Existing per-week exceptions are
/// left behind, inert.
///
/// # Errors
///
/// Returns not-found if the user has no standing order.
pub fn delete_recurring_order(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<MessageResponse, ApiError> {
    persistence
        .delete_standing_order(user_id)
        .map_err(|e| translate_persistence_error("Recurring order", e))?;

    info!(user_id, "Deleted recurring order");
    Ok(MessageResponse {
        message: String::from("Recurring order deleted"),
    })
}

/// Records an exception suppressing the standing order for one week.
///
/// # Errors
///
/// Returns a conflict if an exception already exists for the week.
pub fn post_exception(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    query: WeekQuery,
) -> Result<ExceptionResponse, ApiError> {
    let week: Week = select_week(query, clock)?;

    let record = persistence
        .create_exception(user_id, week)
        .map_err(|e| translate_persistence_error("Exception", e))?;

    info!(user_id, week = %week, "Created exception");
    Ok(ExceptionResponse {
        exception_id: record.exception_id,
        week: record.week.week,
        year: record.week.year,
    })
}

/// Deletes an exception by id, restoring the standing order for that
/// week.
///
/// # Errors
///
/// Returns not-found if the exception does not exist or is owned by a
/// different user.
pub fn delete_exception(
    persistence: &mut Persistence,
    user_id: i64,
    exception_id: i64,
) -> Result<MessageResponse, ApiError> {
    persistence
        .delete_exception(user_id, exception_id)
        .map_err(|e| translate_persistence_error("Exception", e))?;

    info!(user_id, exception_id, "Deleted exception");
    Ok(MessageResponse {
        message: String::from("Exception deleted"),
    })
}

/// Aggregates every user's resolved order for one week.
///
/// Uses the batched union-then-override aggregation, which matches
/// per-user resolution exactly.
///
/// # Errors
///
/// Returns an error if the week selector is invalid or the reads fail.
pub fn get_week_orders(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    query: WeekQuery,
) -> Result<WeekOrdersResponse, ApiError> {
    let week: Week = select_week(query, clock)?;
    let rows: WeekAggregateRows = persistence
        .week_aggregate_rows(week)
        .map_err(|e| translate_persistence_error("Week", e))?;

    let mut names: BTreeMap<i64, String> = BTreeMap::new();
    for (user_id, name, _) in &rows.singles {
        names.insert(*user_id, name.clone());
    }
    for (user_id, name, _) in &rows.standing {
        names.insert(*user_id, name.clone());
    }

    let standing: Vec<(i64, StandingOrder)> = rows
        .standing
        .iter()
        .map(|(user_id, _, order)| (*user_id, *order))
        .collect();
    let singles: Vec<(i64, OrderDetail)> = rows
        .singles
        .iter()
        .map(|(user_id, _, detail)| (*user_id, *detail))
        .collect();

    let resolved: BTreeMap<i64, ResolvedOrder> =
        aggregate_week(week, &standing, &rows.excepted, &singles);

    let mut orders: Vec<WeekOrdersEntry> = Vec::with_capacity(resolved.len());
    for (user_id, outcome) in resolved {
        let (detail, recurring): (OrderDetail, bool) = match outcome {
            ResolvedOrder::Single(detail) => (detail, false),
            ResolvedOrder::Recurring(detail) => (detail, true),
            // aggregate_week only emits applicable orders.
            ResolvedOrder::Excepted | ResolvedOrder::Absent => continue,
        };
        if let Some(name) = names.get(&user_id) {
            orders.push(WeekOrdersEntry {
                user_id,
                name: name.clone(),
                filling: detail.filling,
                bread: detail.bread,
                sauce: detail.sauce,
                recurring,
            });
        }
    }

    Ok(WeekOrdersResponse {
        week: week.week,
        year: week.year,
        orders,
    })
}

/// Reconstructs a page of the user's order history.
///
/// Pages cover ten past weeks strictly before the current week, most
/// recent first, and are derivable from the page index alone.
///
/// # Errors
///
/// Returns an error if the week arithmetic fails or the reads fail.
pub fn get_history(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    user_id: i64,
    query: HistoryQuery,
) -> Result<HistoryResponse, ApiError> {
    let page: u32 = query.page.unwrap_or(0);
    let current: Week = Week::current(clock);

    let weeks: Vec<Week> =
        history_weeks(current, page, HISTORY_PAGE_SIZE).map_err(translate_domain_error)?;

    // history_weeks yields most-recent-first; the window bounds are the
    // two ends of the block.
    let (newest, oldest): (Week, Week) = match (weeks.first(), weeks.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Ok(HistoryResponse {
                page,
                entries: Vec::new(),
            });
        }
    };

    let rows: HistoryRows = persistence
        .history_window(user_id, oldest, newest)
        .map_err(|e| translate_persistence_error("History", e))?;

    let classified: Vec<(Week, ResolvedOrder)> = classify_history(
        &weeks,
        &rows.singles,
        &rows.exceptions,
        rows.standing.as_ref(),
    );

    let entries: Vec<HistoryEntry> = classified
        .into_iter()
        .map(|(week, resolved)| HistoryEntry::from_resolution(week, resolved))
        .collect();

    Ok(HistoryResponse { page, entries })
}
