//! Business definitions for the dashboard KPIs.

/// `(term, definition)` pairs in display order.
pub const GLOSSARY: &[(&str, &str)] = &[
    (
        "Total Items",
        "Total number of child work-items under selected Epics, regardless of state.",
    ),
    (
        "Open Items",
        "Count of all child work-items not in a final state (Closed, Resolved, or Removed).",
    ),
    (
        "Closed Items",
        "Count of child work-items that have reached a final state (Closed, Resolved, or Removed).",
    ),
    (
        "% Complete",
        "Percentage complete = 100 × (Closed Items / Total Items).",
    ),
    ("New (7d)", "Count of work-items created in the last 7 days."),
    (
        "Closed (7d)",
        "Count of work-items closed or removed in the last 7 days.",
    ),
    (
        "Avg Cycle (days)",
        "Average time from creation to last change, in whole days.",
    ),
    (
        "Max Age (days)",
        "Maximum age of any item, measured from creation to now.",
    ),
    (
        "Avg Age (days)",
        "Average age of all items, measured from creation to now.",
    ),
    (
        "Type Breakdown",
        "Distribution of work-item types (Feature, Story, Task, Bug, etc.) under selected Epics.",
    ),
    (
        "Top Assignees",
        "Top 3 users with the most open child work-items.",
    ),
    (
        "Last Sync",
        "UTC timestamp of the last data fetch from Azure DevOps.",
    ),
];

/// Look up a definition by its term.
#[must_use]
pub fn definition(term: &str) -> Option<&'static str> {
    GLOSSARY
        .iter()
        .find(|(key, _)| *key == term)
        .map(|(_, value)| *value)
}
