//! In-memory [`WorkItemApi`] for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use kev_core::WorkItemId;
use tokio::sync::Mutex;

use crate::api::{FetchMode, IdPageRequest, WorkItemApi};
use crate::error::DevOpsError;
use crate::wire::{HIERARCHY_FORWARD, WorkItemRecord};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Query(IdPageRequest),
    Fetch { ids: Vec<WorkItemId>, mode: FetchMode },
}

/// Mock tracking service.
///
/// Every query, whatever its predicate, pages over the same configured ID
/// list, honouring the cursor and `top`. Fetches return the stored records of
/// the requested IDs in request order; unknown IDs are skipped. Relations are
/// only returned for [`FetchMode::Relations`].
#[derive(Debug, Default)]
pub struct MockWorkItemApi {
    query_ids: Vec<WorkItemId>,
    records: HashMap<WorkItemId, WorkItemRecord>,
    fail_query_on: Option<usize>,
    fail_fetch_on: Option<usize>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockWorkItemApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs every query matches. Stored sorted and deduplicated.
    #[must_use]
    pub fn with_query_ids(mut self, ids: impl IntoIterator<Item = WorkItemId>) -> Self {
        self.query_ids.extend(ids);
        self.query_ids.sort_unstable();
        self.query_ids.dedup();
        self
    }

    #[must_use]
    pub fn with_record(mut self, record: WorkItemRecord) -> Self {
        self.records.insert(record.id, record);
        self
    }

    #[must_use]
    pub fn with_records(self, records: impl IntoIterator<Item = WorkItemRecord>) -> Self {
        records.into_iter().fold(self, Self::with_record)
    }

    /// Add `parent → child` forward links, creating bare records as needed.
    #[must_use]
    pub fn with_links(mut self, links: &[(u32, &str)]) -> Self {
        for &(parent, target) in links {
            let Some(parent) = WorkItemId::new(parent) else {
                continue;
            };
            let record = self
                .records
                .remove(&parent)
                .unwrap_or_else(|| WorkItemRecord::new(parent));
            let url = format!("https://dev.azure.com/mock/_apis/wit/workItems/{target}");
            self.records
                .insert(parent, record.with_relation(HIERARCHY_FORWARD, url));
        }
        self
    }

    /// Fail the `n`-th query call (1-based) with HTTP 500.
    #[must_use]
    pub const fn fail_query_on(mut self, n: usize) -> Self {
        self.fail_query_on = Some(n);
        self
    }

    /// Fail the `n`-th fetch call (1-based) with HTTP 500.
    #[must_use]
    pub const fn fail_fetch_on(mut self, n: usize) -> Self {
        self.fail_fetch_on = Some(n);
        self
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    pub async fn query_calls(&self) -> Vec<IdPageRequest> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                MockCall::Query(request) => Some(request.clone()),
                MockCall::Fetch { .. } => None,
            })
            .collect()
    }

    pub async fn fetch_calls(&self) -> Vec<Vec<WorkItemId>> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                MockCall::Fetch { ids, .. } => Some(ids.clone()),
                MockCall::Query(_) => None,
            })
            .collect()
    }

    /// Record a call and return its 1-based ordinal among calls of its kind.
    async fn record(&self, call: MockCall) -> usize {
        let mut calls = self.calls.lock().await;
        let is_query = matches!(call, MockCall::Query(_));
        calls.push(call);
        calls
            .iter()
            .filter(|c| matches!(c, MockCall::Query(_)) == is_query)
            .count()
    }
}

fn injected_failure(kind: &str, n: usize) -> DevOpsError {
    DevOpsError::Http {
        status: 500,
        body: format!("injected failure on {kind} call {n}"),
    }
}

#[async_trait]
impl WorkItemApi for MockWorkItemApi {
    async fn query_ids(&self, request: &IdPageRequest) -> Result<Vec<WorkItemId>, DevOpsError> {
        let n = self.record(MockCall::Query(request.clone())).await;
        if self.fail_query_on == Some(n) {
            return Err(injected_failure("query", n));
        }
        Ok(self
            .query_ids
            .iter()
            .copied()
            .filter(|id| request.after.is_none_or(|after| *id > after))
            .take(request.top)
            .collect())
    }

    async fn fetch_items(
        &self,
        ids: &[WorkItemId],
        mode: FetchMode,
    ) -> Result<Vec<WorkItemRecord>, DevOpsError> {
        let n = self
            .record(MockCall::Fetch {
                ids: ids.to_vec(),
                mode,
            })
            .await;
        if self.fail_fetch_on == Some(n) {
            return Err(injected_failure("fetch", n));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .map(|record| {
                let mut record = record.clone();
                if mode != FetchMode::Relations {
                    record.relations.clear();
                }
                record
            })
            .collect())
    }
}
