// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week-scoped order resolution.
//!
//! Resolution decides which order applies to a user for a week under
//! strict precedence: an explicit one-off order wins over an exception,
//! which wins over a standing order, which wins over nothing. The
//! functions here are pure; callers fetch the records (ideally inside one
//! consistent snapshot) and feed them in as plain data. The batched
//! aggregate and the history classification must always agree with the
//! per-user [`resolve`].

use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::types::OrderDetail;
use crate::week::Week;

/// A user's standing (recurring) order.
///
/// Applies to every week from `start_week` onward until cancelled, unless
/// a one-off order or an exception takes precedence for a given week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingOrder {
    /// The order contents.
    pub detail: OrderDetail,
    /// The first week this order applies to.
    pub start_week: Week,
}

impl StandingOrder {
    /// Whether this standing order is active for the given week.
    #[must_use]
    pub fn applies_to(&self, week: Week) -> bool {
        self.start_week <= week
    }
}

/// The outcome of resolving a (user, week) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedOrder {
    /// An explicit one-off order exists for the week.
    Single(OrderDetail),
    /// The standing order applies to the week.
    Recurring(OrderDetail),
    /// An exception suppresses the standing order for the week.
    /// Distinguishable from "nothing ever set".
    Excepted,
    /// No order of any kind applies.
    Absent,
}

impl ResolvedOrder {
    /// The order contents, if any order applies.
    #[must_use]
    pub const fn detail(&self) -> Option<OrderDetail> {
        match self {
            Self::Single(detail) | Self::Recurring(detail) => Some(*detail),
            Self::Excepted | Self::Absent => None,
        }
    }
}

/// Resolves the order for one user and one week.
///
/// Precedence is strict and first-match-wins:
///
/// 1. a one-off order for the week;
/// 2. an exception for the week;
/// 3. a standing order whose start week is on or before the week;
/// 4. nothing.
///
/// The three inputs must come from a single consistent read so that a
/// concurrent write cannot make an order appear both present and absent
/// within one resolution.
#[must_use]
pub fn resolve(
    single: Option<OrderDetail>,
    excepted: bool,
    standing: Option<&StandingOrder>,
    week: Week,
) -> ResolvedOrder {
    if let Some(detail) = single {
        return ResolvedOrder::Single(detail);
    }
    if excepted {
        return ResolvedOrder::Excepted;
    }
    match standing {
        Some(order) if order.applies_to(week) => ResolvedOrder::Recurring(order.detail),
        _ => ResolvedOrder::Absent,
    }
}

/// Resolves the orders of every user for one week in a single batch.
///
/// `standing` carries every standing order in the system, `excepted` the
/// user ids with an exception for the target week, and `singles` the
/// one-off orders for the target week. The result contains only users
/// with an applicable order: recurring contributions are inserted first,
/// exception holders removed, then one-off orders overwrite whatever is
/// present. This is equivalent to calling [`resolve`] once per user.
#[must_use]
pub fn aggregate_week(
    week: Week,
    standing: &[(i64, StandingOrder)],
    excepted: &[i64],
    singles: &[(i64, OrderDetail)],
) -> BTreeMap<i64, ResolvedOrder> {
    let mut orders: BTreeMap<i64, ResolvedOrder> = BTreeMap::new();

    for (user_id, order) in standing {
        if order.applies_to(week) {
            orders.insert(*user_id, ResolvedOrder::Recurring(order.detail));
        }
    }

    for user_id in excepted {
        orders.remove(user_id);
    }

    for (user_id, detail) in singles {
        orders.insert(*user_id, ResolvedOrder::Single(*detail));
    }

    orders
}

/// Computes the block of past weeks covered by a history page.
///
/// Page 0 holds the `page_size` weeks immediately preceding `current`,
/// most recent first; page 1 the next block before that, and so on. Pages
/// are derivable from the index alone, so pagination carries no cursor
/// state.
///
/// # Errors
///
/// Returns an error if the week arithmetic leaves the supported calendar
/// range.
pub fn history_weeks(
    current: Week,
    page_index: u32,
    page_size: u32,
) -> Result<Vec<Week>, DomainError> {
    let low: i64 = i64::from(page_size) * i64::from(page_index) + 1;
    let high: i64 = i64::from(page_size) * (i64::from(page_index) + 1);

    (low..=high).map(|back| current.offset(-back)).collect()
}

/// Classifies each week of a history page for a single user.
///
/// `singles` and `exceptions` carry the user's records that fall inside
/// the page window; `standing` the user's standing order, if any. Each
/// week is classified with the same precedence as [`resolve`].
#[must_use]
pub fn classify_history(
    weeks: &[Week],
    singles: &[(Week, OrderDetail)],
    exceptions: &[Week],
    standing: Option<&StandingOrder>,
) -> Vec<(Week, ResolvedOrder)> {
    weeks
        .iter()
        .map(|&week| {
            let single: Option<OrderDetail> = singles
                .iter()
                .find(|(order_week, _)| *order_week == week)
                .map(|(_, detail)| *detail);
            let excepted: bool = exceptions.contains(&week);
            (week, resolve(single, excepted, standing, week))
        })
        .collect()
}
