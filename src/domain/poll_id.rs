//! Type-safe poll identifier.
//!
//! [`PollId`] is a newtype wrapper around the `i64` row key assigned by the
//! persistence gateway, so that poll identifiers cannot be confused with page
//! numbers, counts or other integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a persisted poll.
///
/// Allocated by the store on first save from a monotonically increasing
/// sequence starting at 1. Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(i64);

impl PollId {
    /// Wraps a raw row key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw row key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PollId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<i64> for PollId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<PollId> for i64 {
    fn from(id: PollId) -> Self {
        id.0
    }
}
