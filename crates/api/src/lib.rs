// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API layer for the cob order tracker.
//!
//! Sits between the HTTP surface and the persistence adapter: wire DTOs,
//! the API error taxonomy, authentication, and one handler function per
//! operation. Handlers own the semantics; the server binary only extracts
//! requests and maps [`error::ApiError`] variants to status codes.

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

pub mod auth;
pub mod error;
pub mod handlers;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::AuthenticationService;
pub use error::{ApiError, AuthError};
