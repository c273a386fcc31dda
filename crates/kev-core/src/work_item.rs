use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::WorkItemId;
use crate::states::StateSet;

/// Display label for items with no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Display label for items with no area path.
pub const UNSPECIFIED_AREA: &str = "Unspecified";

/// An immutable snapshot of one work item, fetched once per query cycle.
///
/// Timestamps are optional because summary requests (e.g. Epic discovery)
/// ask the service for a reduced field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub title: String,
    pub work_item_type: String,
    pub state: String,
    pub assigned_to: Option<String>,
    pub area_path: String,
    pub created: Option<DateTime<Utc>>,
    pub changed: Option<DateTime<Utc>>,
}

impl WorkItem {
    /// Whether the item's state is in `final_states`.
    #[must_use]
    pub fn is_final(&self, final_states: &StateSet) -> bool {
        final_states.contains(&self.state)
    }

    /// Assignee display name, or `Unassigned`.
    #[must_use]
    pub fn assignee_label(&self) -> &str {
        self.assigned_to.as_deref().unwrap_or(UNASSIGNED)
    }

    /// Area path, or `Unspecified` when blank.
    #[must_use]
    pub fn area_label(&self) -> &str {
        if self.area_path.is_empty() {
            UNSPECIFIED_AREA
        } else {
            &self.area_path
        }
    }

    /// Browser link to the item's edit page.
    #[must_use]
    pub fn edit_url(&self, organization_url: &str, project: &str) -> String {
        format!(
            "{}/{project}/_workitems/edit/{}",
            organization_url.trim_end_matches('/'),
            self.id
        )
    }
}

/// Split items into (active, inactive) by the final-state set, preserving order.
#[must_use]
pub fn partition_by_state<'a>(
    items: &'a [WorkItem],
    final_states: &StateSet,
) -> (Vec<&'a WorkItem>, Vec<&'a WorkItem>) {
    items.iter().partition(|item| !item.is_final(final_states))
}

/// Sort newest-changed first. Items without a timestamp sink to the bottom.
pub fn sort_by_last_changed_desc(items: &mut [WorkItem]) {
    items.sort_by(|a, b| b.changed.cmp(&a.changed).then(a.id.cmp(&b.id)));
}
