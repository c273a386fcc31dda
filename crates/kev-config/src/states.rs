//! State taxonomy configuration.

use kev_core::StateSet;
use kev_core::states::{DEFAULT_DISCOVERY_EXCLUDED, DEFAULT_FINAL_STATES, DEFAULT_TASK_EXCLUDED};
use serde::{Deserialize, Serialize};

fn to_strings(states: &[&str]) -> Vec<String> {
    states.iter().map(|s| (*s).to_string()).collect()
}

fn default_final_states() -> Vec<String> {
    to_strings(DEFAULT_FINAL_STATES)
}

fn default_discovery_excluded() -> Vec<String> {
    to_strings(DEFAULT_DISCOVERY_EXCLUDED)
}

fn default_task_excluded() -> Vec<String> {
    to_strings(DEFAULT_TASK_EXCLUDED)
}

/// The discovery and aggregation state sets are configured independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatesConfig {
    /// States counted as closed during aggregation.
    #[serde(default = "default_final_states")]
    pub final_states: Vec<String>,

    /// States that keep an Epic out of discovery.
    #[serde(default = "default_discovery_excluded")]
    pub discovery_excluded: Vec<String>,

    /// States that keep a task out of the open-task query.
    #[serde(default = "default_task_excluded")]
    pub task_excluded: Vec<String>,
}

impl Default for StatesConfig {
    fn default() -> Self {
        Self {
            final_states: default_final_states(),
            discovery_excluded: default_discovery_excluded(),
            task_excluded: default_task_excluded(),
        }
    }
}

impl StatesConfig {
    #[must_use]
    pub fn final_set(&self) -> StateSet {
        StateSet::new(self.final_states.iter().cloned())
    }

    #[must_use]
    pub fn discovery_excluded_set(&self) -> StateSet {
        StateSet::new(self.discovery_excluded.iter().cloned())
    }

    #[must_use]
    pub fn task_excluded_set(&self) -> StateSet {
        StateSet::new(self.task_excluded.iter().cloned())
    }
}
