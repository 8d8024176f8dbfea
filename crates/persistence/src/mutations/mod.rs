// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write functions. Multi-step writes are composed into transactions by
//! the `Persistence` adapter.

pub mod orders;
pub mod users;
