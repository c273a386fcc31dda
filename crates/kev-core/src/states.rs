//! Work item state taxonomy.
//!
//! Two independent sets are in play: the states that exclude an Epic from
//! initial discovery, and the "final" states that partition a detail set into
//! active and inactive items during aggregation. They overlap but are not the
//! same, so each is configured on its own.

use serde::{Deserialize, Serialize};

/// Default final states used during aggregation.
pub const DEFAULT_FINAL_STATES: &[&str] = &["Closed", "Removed", "Resolved"];

/// Default states that exclude an Epic from discovery.
pub const DEFAULT_DISCOVERY_EXCLUDED: &[&str] = &["Closed", "Cancelled", "Removed"];

/// Default states that exclude a task from the open-task query.
pub const DEFAULT_TASK_EXCLUDED: &[&str] = &["Closed"];

/// An ordered, duplicate-free set of state names.
///
/// Membership is an exact, case-sensitive match: the service reports states
/// with their configured casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(Vec<String>);

impl StateSet {
    /// Build a set from names, dropping blanks and duplicates.
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for state in states {
            let state = state.into();
            let trimmed = state.trim();
            if !trimmed.is_empty() && !out.iter().any(|s| s == trimmed) {
                out.push(trimmed.to_string());
            }
        }
        Self(out)
    }

    /// Aggregation-time final states: `Closed`, `Removed`, `Resolved`.
    #[must_use]
    pub fn final_states() -> Self {
        Self::new(DEFAULT_FINAL_STATES.iter().copied())
    }

    /// Epic discovery exclusions: `Closed`, `Cancelled`, `Removed`.
    #[must_use]
    pub fn discovery_excluded() -> Self {
        Self::new(DEFAULT_DISCOVERY_EXCLUDED.iter().copied())
    }

    /// Open-task query exclusions: `Closed`.
    #[must_use]
    pub fn task_excluded() -> Self {
        Self::new(DEFAULT_TASK_EXCLUDED.iter().copied())
    }

    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        self.0.iter().any(|s| s == state)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
