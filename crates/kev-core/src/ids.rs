//! Work item identifiers.
//!
//! The tracking service assigns globally unique, strictly positive integer IDs.
//! [`WorkItemId`] wraps a [`NonZeroU32`] so a zero ID cannot be constructed.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A strictly positive work item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(NonZeroU32);

impl WorkItemId {
    /// Build an ID from a raw integer. Returns `None` for zero.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkItemId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidId(s.to_string()))
    }
}

impl TryFrom<i64> for WorkItemId {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidId(value.to_string()))
    }
}

/// Join IDs into the comma-separated form the batch endpoint expects.
#[must_use]
pub fn join_ids(ids: &[WorkItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
