// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for the cob-web order system.
//!
//! This crate is persistence-free. It defines the ISO week identity, the
//! order value types, and the pure resolution logic that decides which
//! order applies to a user for a given week. The persistence and API
//! layers feed it plain data and match exhaustively on its results.

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

mod error;
mod resolution;
mod types;
mod week;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use resolution::{
    ResolvedOrder, StandingOrder, aggregate_week, classify_history, history_weeks, resolve,
};
pub use types::{Bread, Filling, OrderDetail, Sauce};
pub use week::{Clock, SystemClock, Week};
