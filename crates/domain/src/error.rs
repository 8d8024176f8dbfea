// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and week arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A (week, year) pair does not correspond to a real calendar week.
    UnrepresentableWeek {
        /// The week number that could not be resolved.
        week: u8,
        /// The year that could not be resolved.
        year: i32,
    },
    /// Date arithmetic overflowed the supported calendar range.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Filling value is not one of the known choices.
    InvalidFilling(String),
    /// Bread value is not one of the known choices.
    InvalidBread(String),
    /// Sauce value is not one of the known choices.
    InvalidSauce(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrepresentableWeek { week, year } => {
                write!(f, "Week {week} of year {year} does not exist")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidFilling(value) => write!(f, "Invalid filling: {value}"),
            Self::InvalidBread(value) => write!(f, "Invalid bread: {value}"),
            Self::InvalidSauce(value) => write!(f, "Invalid sauce: {value}"),
        }
    }
}

impl std::error::Error for DomainError {}
