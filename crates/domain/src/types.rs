// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order value types.
//!
//! An [`OrderDetail`] is an immutable value embedded in whichever order
//! record owns it. The choice sets are closed; unknown values are rejected
//! at the boundary and when re-reading stored rows.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The filling of a cob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filling {
    Bacon,
    Sausage,
    Egg,
    VeganSausage,
}

impl Filling {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bacon => "bacon",
            Self::Sausage => "sausage",
            Self::Egg => "egg",
            Self::VeganSausage => "vegan_sausage",
        }
    }
}

impl FromStr for Filling {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bacon" => Ok(Self::Bacon),
            "sausage" => Ok(Self::Sausage),
            "egg" => Ok(Self::Egg),
            "vegan_sausage" => Ok(Self::VeganSausage),
            _ => Err(DomainError::InvalidFilling(s.to_string())),
        }
    }
}

impl std::fmt::Display for Filling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The bread of a cob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bread {
    White,
    Brown,
}

impl Bread {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Brown => "brown",
        }
    }
}

impl FromStr for Bread {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Self::White),
            "brown" => Ok(Self::Brown),
            _ => Err(DomainError::InvalidBread(s.to_string())),
        }
    }
}

impl std::fmt::Display for Bread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The sauce on a cob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sauce {
    Red,
    Brown,
}

impl Sauce {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Brown => "brown",
        }
    }
}

impl FromStr for Sauce {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "brown" => Ok(Self::Brown),
            _ => Err(DomainError::InvalidSauce(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sauce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The immutable contents of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderDetail {
    /// The filling choice.
    pub filling: Filling,
    /// The bread choice.
    pub bread: Bread,
    /// The sauce choice.
    pub sauce: Sauce,
}

impl OrderDetail {
    /// Creates a new order detail.
    #[must_use]
    pub const fn new(filling: Filling, bread: Bread, sauce: Sauce) -> Self {
        Self {
            filling,
            bread,
            sauce,
        }
    }

    /// Reconstructs an order detail from stored string columns.
    ///
    /// # Errors
    ///
    /// Returns an error if any column holds a value outside the closed
    /// choice sets.
    pub fn parse(filling: &str, bread: &str, sauce: &str) -> Result<Self, DomainError> {
        Ok(Self {
            filling: filling.parse()?,
            bread: bread.parse()?,
            sauce: sauce.parse()?,
        })
    }
}
