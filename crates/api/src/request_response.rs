// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! These DTOs are distinct from domain and persistence types and define
//! the wire contract. Week and year query parameters default to the
//! current ISO week when absent.

use cob_web_domain::{Bread, Filling, OrderDetail, ResolvedOrder, Sauce, Week};
use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Display name, at least three alphanumeric characters.
    pub name: String,
    /// Email address; normalised to lowercase and unique.
    pub email: String,
    /// Password, at least eight characters.
    pub password: String,
    /// Must match `password` exactly.
    pub confirm_password: String,
}

/// A user as exposed over the wire. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// The user's id.
    pub user_id: i64,
    /// The user's display name.
    pub name: String,
    /// The user's email, lowercased.
    pub email: String,
}

/// Request to log in with name-or-email credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The user's name or email address.
    pub login: String,
    /// The user's password.
    pub password: String,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    /// The opaque token value for the `Authorization: Bearer` header.
    pub token: String,
    /// Expiry instant, ISO 8601.
    pub expires_at: String,
}

/// Week selector query parameters. Both absent means the current week;
/// supplying only one of the pair is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct WeekQuery {
    /// The ISO week number.
    pub week: Option<u8>,
    /// The ISO week-based year.
    pub year: Option<i32>,
}

/// Request to place or replace a one-off order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleOrderRequest {
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
}

/// Query parameters for deleting an order: either an explicit order id or
/// a week selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DeleteOrderQuery {
    /// The id of the one-off order to delete.
    pub id: Option<i64>,
    /// The ISO week number.
    pub week: Option<u8>,
    /// The ISO week-based year.
    pub year: Option<i32>,
}

/// A resolved order for one user and one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderResponse {
    /// The ISO week number.
    pub week: u8,
    /// The ISO week-based year.
    pub year: i32,
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
    /// Whether this order comes from the standing order rather than an
    /// explicit one-off.
    pub recurring: bool,
}

impl OrderResponse {
    /// Builds a response from a week and resolved detail.
    #[must_use]
    pub const fn new(week: Week, detail: OrderDetail, recurring: bool) -> Self {
        Self {
            week: week.week,
            year: week.year,
            filling: detail.filling,
            bread: detail.bread,
            sauce: detail.sauce,
            recurring,
        }
    }
}

/// Request to create or replace the standing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringOrderRequest {
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
    /// First week the order applies to; defaults to the current week.
    pub start_week: Option<u8>,
    /// Week-based year of the start week.
    pub start_year: Option<i32>,
}

/// The standing order as exposed over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringOrderResponse {
    /// The ISO week number of the first applicable week.
    pub start_week: u8,
    /// The week-based year of the first applicable week.
    pub start_year: i32,
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
}

/// A per-week exception as exposed over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionResponse {
    /// The exception's id, used for deletion.
    pub exception_id: i64,
    /// The ISO week number of the suppressed week.
    pub week: u8,
    /// The week-based year of the suppressed week.
    pub year: i32,
}

/// One user's entry in a week aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekOrdersEntry {
    /// The user's id.
    pub user_id: i64,
    /// The user's display name.
    pub name: String,
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
    /// Whether the order comes from the user's standing order.
    pub recurring: bool,
}

/// All applicable orders for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekOrdersResponse {
    /// The ISO week number.
    pub week: u8,
    /// The week-based year.
    pub year: i32,
    /// One entry per user with an applicable order, ordered by user id.
    pub orders: Vec<WeekOrdersEntry>,
}

/// History page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct HistoryQuery {
    /// Zero-based page index; defaults to 0.
    pub page: Option<u32>,
}

/// How a past week classified for the requesting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    /// An explicit one-off order.
    Single,
    /// The standing order applied.
    Recurring,
    /// The standing order was suppressed by an exception.
    Excepted,
    /// No order of any kind.
    Absent,
}

/// One past week in a history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// The ISO week number.
    pub week: u8,
    /// The week-based year.
    pub year: i32,
    /// The classification for the week.
    pub status: HistoryStatus,
    /// The filling, when an order applied.
    pub filling: Option<Filling>,
    /// The bread, when an order applied.
    pub bread: Option<Bread>,
    /// The sauce, when an order applied.
    pub sauce: Option<Sauce>,
}

impl HistoryEntry {
    /// Builds an entry from a classified week.
    #[must_use]
    pub const fn from_resolution(week: Week, resolved: ResolvedOrder) -> Self {
        let (status, detail): (HistoryStatus, Option<OrderDetail>) = match resolved {
            ResolvedOrder::Single(detail) => (HistoryStatus::Single, Some(detail)),
            ResolvedOrder::Recurring(detail) => (HistoryStatus::Recurring, Some(detail)),
            ResolvedOrder::Excepted => (HistoryStatus::Excepted, None),
            ResolvedOrder::Absent => (HistoryStatus::Absent, None),
        };

        let (filling, bread, sauce) = match detail {
            Some(d) => (Some(d.filling), Some(d.bread), Some(d.sauce)),
            None => (None, None, None),
        };

        Self {
            week: week.week,
            year: week.year,
            status,
            filling,
            bread,
            sauce,
        }
    }
}

/// A page of order history, most recent week first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryResponse {
    /// The requested page index.
    pub page: u32,
    /// Exactly one entry per past week in the page window.
    pub entries: Vec<HistoryEntry>,
}

/// A plain confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    /// The confirmation text.
    pub message: String,
}
