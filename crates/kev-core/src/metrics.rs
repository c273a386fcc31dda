//! KPI aggregation over a resolved detail set.
//!
//! Every function here is pure: the caller supplies the items, the final-state
//! set, and the reference instant. Durations are whole days, truncated.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::states::StateSet;
use crate::work_item::WorkItem;

/// Look-back window for the "new" and "closed" velocity counters.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// How many assignees the top-assignee list keeps.
pub const TOP_ASSIGNEES: usize = 3;

/// A label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

/// The KPI banner for one rendering cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub pct_complete: f64,
    pub new_last_7d: usize,
    pub closed_last_7d: usize,
    pub avg_cycle_days: f64,
    pub max_age_days: i64,
    pub avg_age_days: f64,
    pub type_breakdown: Vec<CountEntry>,
    pub top_assignees: Vec<CountEntry>,
}

impl KpiSummary {
    /// Aggregate `items` as of `now`.
    #[must_use]
    pub fn compute(items: &[WorkItem], final_states: &StateSet, now: DateTime<Utc>) -> Self {
        let window_start = now - Duration::days(RECENT_WINDOW_DAYS);
        let total = items.len();
        let closed = items.iter().filter(|i| i.is_final(final_states)).count();

        let new_last_7d = items
            .iter()
            .filter(|i| i.created.is_some_and(|c| c >= window_start))
            .count();
        let closed_last_7d = items
            .iter()
            .filter(|i| i.is_final(final_states) && i.changed.is_some_and(|c| c >= window_start))
            .count();

        let cycles: Vec<i64> = items
            .iter()
            .filter_map(|i| Some((i.changed? - i.created?).num_days()))
            .collect();
        let ages: Vec<i64> = items
            .iter()
            .filter_map(|i| i.created.map(|c| (now - c).num_days()))
            .collect();

        Self {
            total,
            open: total - closed,
            closed,
            pct_complete: percent_complete(closed, total),
            new_last_7d,
            closed_last_7d,
            avg_cycle_days: round1(mean(&cycles)),
            max_age_days: ages.iter().copied().max().unwrap_or(0),
            avg_age_days: round1(mean(&ages)),
            type_breakdown: type_breakdown(items),
            top_assignees: top_open_assignees(items, final_states, TOP_ASSIGNEES),
        }
    }
}

/// `100 * closed / total`, rounded to one decimal; 0.0 for an empty set.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_complete(closed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(closed as f64 / total as f64 * 100.0)
}

/// Count of items per work item type, most frequent first.
#[must_use]
pub fn type_breakdown(items: &[WorkItem]) -> Vec<CountEntry> {
    ranked(items.iter().map(|i| i.work_item_type.as_str()))
}

/// The `limit` assignees holding the most open items.
#[must_use]
pub fn top_open_assignees(
    items: &[WorkItem],
    final_states: &StateSet,
    limit: usize,
) -> Vec<CountEntry> {
    let mut ranked = ranked(
        items
            .iter()
            .filter(|i| !i.is_final(final_states))
            .map(WorkItem::assignee_label),
    );
    ranked.truncate(limit);
    ranked
}

/// Count labels and sort by count desc, then label asc.
#[must_use]
pub fn ranked<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry {
            label: label.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}
