// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row representations and week-column conversions.
//!
//! Week columns hold the canonical Monday of the ISO week as
//! `YYYY-MM-DD` text. The conversion functions here are the only place
//! the persistence layer touches that encoding; everything else works
//! with [`Week`] and [`Date`].

use cob_web_domain::{OrderDetail, StandingOrder, Week};
use time::Date;
use time::macros::format_description;

use crate::error::PersistenceError;

/// The week-column text encoding.
const WEEK_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Encodes a week's canonical Monday for storage.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted. This does not occur
/// for dates in the supported calendar range.
pub fn week_column(date: Date) -> Result<String, PersistenceError> {
    date.format(&WEEK_FORMAT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format week column: {e}")))
}

/// Decodes a stored week column back to its week identity.
///
/// # Errors
///
/// Returns a reconstruction error if the stored text is not a valid date.
pub fn parse_week_column(text: &str) -> Result<Week, PersistenceError> {
    let date: Date = Date::parse(text, &WEEK_FORMAT).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid week column '{text}': {e}"))
    })?;
    Ok(Week::from_date(date))
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The canonical numeric identifier.
    pub user_id: i64,
    /// The user's display name.
    pub name: String,
    /// The user's email, stored lowercased.
    pub email: String,
    /// The bcrypt password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A stored bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// The canonical numeric identifier.
    pub token_id: i64,
    /// The opaque token value.
    pub token_value: String,
    /// The owning user.
    pub user_id: i64,
    /// Expiry instant, ISO 8601 text.
    pub expires_at: String,
}

/// A stored one-off order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOrderRecord {
    /// The canonical numeric identifier.
    pub order_id: i64,
    /// The owning user.
    pub user_id: i64,
    /// The week this order is for.
    pub week: Week,
    /// The order contents.
    pub detail: OrderDetail,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl SingleOrderRecord {
    /// Maps a raw row to a record, decoding the week and detail columns.
    pub(crate) fn from_row(
        row: (i64, i64, String, String, String, String, String, String),
    ) -> Result<Self, PersistenceError> {
        let (order_id, user_id, week_start, filling, bread, sauce, created_at, updated_at) = row;
        Ok(Self {
            order_id,
            user_id,
            week: parse_week_column(&week_start)?,
            detail: OrderDetail::parse(&filling, &bread, &sauce)?,
            created_at,
            updated_at,
        })
    }
}

/// A stored standing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingOrderRecord {
    /// The canonical numeric identifier.
    pub order_id: i64,
    /// The owning user. At most one standing order per user.
    pub user_id: i64,
    /// The first week the order applies to.
    pub start_week: Week,
    /// The order contents.
    pub detail: OrderDetail,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl StandingOrderRecord {
    /// Maps a raw row to a record, decoding the week and detail columns.
    pub(crate) fn from_row(
        row: (i64, i64, String, String, String, String, String, String),
    ) -> Result<Self, PersistenceError> {
        let (order_id, user_id, start_week, filling, bread, sauce, created_at, updated_at) = row;
        Ok(Self {
            order_id,
            user_id,
            start_week: parse_week_column(&start_week)?,
            detail: OrderDetail::parse(&filling, &bread, &sauce)?,
            created_at,
            updated_at,
        })
    }

    /// The domain view of this record.
    #[must_use]
    pub const fn to_standing(&self) -> StandingOrder {
        StandingOrder {
            detail: self.detail,
            start_week: self.start_week,
        }
    }
}

/// A stored per-week exception to a standing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRecord {
    /// The canonical numeric identifier.
    pub exception_id: i64,
    /// The owning user.
    pub user_id: i64,
    /// The week the standing order is suppressed for.
    pub week: Week,
    /// Creation timestamp.
    pub created_at: String,
}

/// The records relevant to resolving one (user, week) pair, read in a
/// single consistent snapshot.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    /// The one-off order for the week, if any.
    pub single: Option<SingleOrderRecord>,
    /// Whether an exception exists for the week.
    pub excepted: bool,
    /// The user's standing order, if any.
    pub standing: Option<StandingOrderRecord>,
}

/// Everything needed to aggregate one week across all users.
#[derive(Debug, Clone, Default)]
pub struct WeekAggregateRows {
    /// One-off orders for the week: (`user_id`, user name, detail).
    pub singles: Vec<(i64, String, OrderDetail)>,
    /// All standing orders: (`user_id`, user name, standing order).
    pub standing: Vec<(i64, String, StandingOrder)>,
    /// User ids with an exception for the week.
    pub excepted: Vec<i64>,
}

/// One user's records falling inside a history page window.
#[derive(Debug, Clone, Default)]
pub struct HistoryRows {
    /// One-off orders in the window, keyed by week.
    pub singles: Vec<(Week, OrderDetail)>,
    /// Weeks with an exception in the window.
    pub exceptions: Vec<Week>,
    /// The user's standing order, if any.
    pub standing: Option<StandingOrder>,
}

/// The effect a single-order delete had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleDeleteOutcome {
    /// A one-off order row was deleted.
    OrderDeleted,
    /// The week resolved to the standing order, so an exception was
    /// recorded instead of deleting anything.
    ExceptionRecorded,
}
