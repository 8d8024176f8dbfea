// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use cob_web_domain::{Bread, Filling, OrderDetail, Sauce};

use crate::Persistence;

/// A fresh isolated in-memory persistence instance.
pub(crate) fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to initialize in-memory database")
}

/// Creates a user and returns their id.
pub(crate) fn make_user(persistence: &mut Persistence, name: &str, email: &str) -> i64 {
    persistence
        .create_user(name, email, "$2b$12$fakehashfakehashfakehash")
        .expect("Failed to create user")
        .user_id
}

pub(crate) const fn bacon_white_red() -> OrderDetail {
    OrderDetail::new(Filling::Bacon, Bread::White, Sauce::Red)
}

pub(crate) const fn sausage_brown_brown() -> OrderDetail {
    OrderDetail::new(Filling::Sausage, Bread::Brown, Sauce::Brown)
}
