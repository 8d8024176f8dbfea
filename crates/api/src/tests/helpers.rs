// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use cob_web_domain::{Bread, Clock, Filling, Sauce, Week};
use cob_web_persistence::Persistence;
use cob_web_persistence::data_models::UserRecord;
use time::{Date, Month};

use crate::auth::AuthenticationService;
use crate::request_response::{SignupRequest, SingleOrderRequest, WeekQuery};

/// Clock pinned to Wednesday 2026-07-29, ISO week 31 of 2026.
pub(crate) struct FixedClock;

impl Clock for FixedClock {
    fn today(&self) -> Date {
        Date::from_calendar_date(2026, Month::July, 29).expect("Valid date")
    }
}

/// The week the fixed clock sits in.
pub(crate) fn current_week() -> Week {
    Week::new(31, 2026)
}

pub(crate) fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to initialize in-memory database")
}

/// Signs up a user through the full validation path.
pub(crate) fn signup_user(persistence: &mut Persistence, name: &str, email: &str) -> UserRecord {
    let request: SignupRequest = SignupRequest {
        name: String::from(name),
        email: String::from(email),
        password: String::from("correct-horse"),
        confirm_password: String::from("correct-horse"),
    };
    AuthenticationService::signup(persistence, &request).expect("Signup should succeed")
}

pub(crate) const fn bacon_order() -> SingleOrderRequest {
    SingleOrderRequest {
        filling: Filling::Bacon,
        bread: Bread::White,
        sauce: Sauce::Red,
    }
}

pub(crate) const fn sausage_order() -> SingleOrderRequest {
    SingleOrderRequest {
        filling: Filling::Sausage,
        bread: Bread::Brown,
        sauce: Sauce::Brown,
    }
}

/// A week selector for an explicit week.
pub(crate) const fn week_query(week: Week) -> WeekQuery {
    WeekQuery {
        week: Some(week.week),
        year: Some(week.year),
    }
}
