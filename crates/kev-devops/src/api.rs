//! The seam between the query engine and the tracking service.
//!
//! [`WorkItemApi`] is the two-endpoint contract the engine needs: one call that
//! pages IDs out of a WIQL query, and one call that fetches a batch of records.
//! [`crate::DevOpsClient`] implements it over HTTP; [`crate::mock::MockWorkItemApi`]
//! implements it in memory.

use async_trait::async_trait;
use kev_core::WorkItemId;

use crate::error::DevOpsError;
use crate::wire::WorkItemRecord;

/// Fields requested when only a summary is needed (Epic discovery).
pub const SUMMARY_FIELDS: &[&str] = &[
    "System.Id",
    "System.Title",
    "System.WorkItemType",
    "System.State",
    "System.AssignedTo",
    "System.AreaPath",
];

/// Fields requested for detail lookups feeding the dashboard.
pub const DETAIL_FIELDS: &[&str] = &[
    "System.Id",
    "System.Title",
    "System.WorkItemType",
    "System.State",
    "System.AssignedTo",
    "System.AreaPath",
    "System.CreatedDate",
    "System.ChangedDate",
];

/// What a batch detail request should return.
///
/// The service rejects a field list combined with relation expansion, so the
/// modes are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// Every field of each item.
    AllFields,
    /// Only the named fields.
    Fields(&'static [&'static str]),
    /// Every field plus the relation link collection.
    Relations,
}

/// One page of an ID query: `predicate AND id > after`, ordered by ID,
/// capped at `top` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPageRequest {
    pub predicate: String,
    /// Exclusive lower bound. `None` starts from the beginning.
    pub after: Option<WorkItemId>,
    pub top: usize,
}

impl IdPageRequest {
    /// Render the WIQL statement for this page.
    #[must_use]
    pub fn wiql(&self) -> String {
        let cursor = self.after.map_or(0, WorkItemId::get);
        format!(
            "SELECT [System.Id] FROM WorkItems WHERE {} AND [System.Id] > {cursor} ORDER BY [System.Id]",
            self.predicate
        )
    }
}

/// Read-only access to the tracking service.
#[async_trait]
pub trait WorkItemApi: Send + Sync {
    /// Run one page of an ID query. IDs come back in ascending order.
    async fn query_ids(&self, request: &IdPageRequest) -> Result<Vec<WorkItemId>, DevOpsError>;

    /// Fetch records for at most one batch of IDs.
    async fn fetch_items(
        &self,
        ids: &[WorkItemId],
        mode: FetchMode,
    ) -> Result<Vec<WorkItemRecord>, DevOpsError>;
}
