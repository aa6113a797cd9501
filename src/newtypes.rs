//! Newtypes used to enforce invariants throughout this library.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that may occur while creating an instance of one of these newtypes.
#[derive(Debug, Error)]
pub enum Error {
    /// The given string is not a valid non-negative integer.
    #[error("invalid retention threshold \"{value}\": {source}")]
    InvalidRetention {
        /// The rejected input.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// A retention threshold in whole days.
///
/// An object becomes eligible for deletion once its age in whole days reaches
/// this threshold. The wrapped integer is unsigned, so a negative threshold
/// cannot be configured; a threshold of zero makes every already-existing
/// object eligible.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RetentionDays(u32);

impl RetentionDays {
    /// Creates a threshold of `days` whole days.
    #[must_use]
    pub const fn new(days: u32) -> Self {
        Self(days)
    }

    /// Whether an object aged `age_days` whole days has reached this
    /// threshold.
    ///
    /// Negative ages belong to objects whose recorded creation time lies in
    /// the future; those are never covered, regardless of the threshold.
    #[must_use]
    pub fn covers(self, age_days: i64) -> bool {
        age_days >= i64::from(self.0)
    }
}

impl fmt::Display for RetentionDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RetentionDays {
    fn from(days: u32) -> Self {
        Self(days)
    }
}

impl FromStr for RetentionDays {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .parse()
            .map(Self)
            .map_err(|source| Error::InvalidRetention {
                value: value.to_string(),
                source,
            })
    }
}
