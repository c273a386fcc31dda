//! Per-render memoization of query results.
//!
//! A dashboard render asks for the same Epics, hierarchies, and detail sets
//! more than once. [`RenderSession`] answers repeats from memory. Entries
//! never expire; dropping the session (or calling [`RenderSession::invalidate`])
//! is the only invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use kev_core::{Credentials, ServiceLimits, StateSet, WorkItem, WorkItemId};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::api::WorkItemApi;
use crate::client::DevOpsClient;
use crate::error::DevOpsError;
use crate::hierarchy::{Hierarchy, resolve_hierarchy};
use crate::query::{WorkItemFilter, fetch_details, get_epics, get_work_items};
use crate::wire::WorkItemRecord;

/// Who is asking: organization, project, and a fingerprint of the token.
///
/// The token itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheScope {
    pub organization_url: String,
    pub project: String,
    pub credential_fingerprint: String,
}

impl CacheScope {
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            organization_url: credentials.organization_url().to_string(),
            project: credentials.project().to_string(),
            credential_fingerprint: fingerprint(credentials.pat()),
        }
    }
}

/// First 16 hex digits of the token's SHA-256.
fn fingerprint(secret: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(secret.as_bytes()));
    digest[..16].to_string()
}

/// A cached operation and its normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Epics { excluded: Vec<String> },
    Hierarchy(WorkItemId),
    /// Sorted and deduplicated.
    Details(Vec<WorkItemId>),
    Tasks { predicate: String },
}

#[derive(Debug, Clone)]
enum Cached {
    Items(Arc<Vec<WorkItem>>),
    Records(Arc<Vec<WorkItemRecord>>),
    Hierarchy(Arc<Hierarchy>),
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<(CacheScope, Operation), Cached>,
    stats: CacheStats,
}

/// Mapping of `(scope, operation)` to results.
#[derive(Debug, Default)]
pub struct RenderCache {
    inner: Mutex<CacheInner>,
}

impl RenderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, key: &(CacheScope, Operation)) -> Option<Cached> {
        let mut inner = self.inner.lock().await;
        let found = inner.entries.get(key).cloned();
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    async fn insert(&self, key: (CacheScope, Operation), value: Cached) {
        self.inner.lock().await.entries.insert(key, value);
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }
}

/// One rendering cycle: an API handle, its scope, the limits, and a cache.
pub struct RenderSession {
    api: Arc<dyn WorkItemApi>,
    scope: CacheScope,
    limits: ServiceLimits,
    cache: RenderCache,
}

impl RenderSession {
    #[must_use]
    pub fn new(api: Arc<dyn WorkItemApi>, scope: CacheScope, limits: ServiceLimits) -> Self {
        Self {
            api,
            scope,
            limits,
            cache: RenderCache::new(),
        }
    }

    /// Session over a live client, scoped by the client's credentials.
    #[must_use]
    pub fn for_client(client: DevOpsClient, limits: ServiceLimits) -> Self {
        let scope = CacheScope::new(client.credentials());
        Self::new(Arc::new(client), scope, limits)
    }

    /// The underlying API, for uncached one-off queries.
    #[must_use]
    pub fn api(&self) -> &dyn WorkItemApi {
        self.api.as_ref()
    }

    #[must_use]
    pub const fn scope(&self) -> &CacheScope {
        &self.scope
    }

    #[must_use]
    pub const fn limits(&self) -> ServiceLimits {
        self.limits
    }

    #[must_use]
    pub const fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Drop every cached entry.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }

    fn key(&self, operation: Operation) -> (CacheScope, Operation) {
        (self.scope.clone(), operation)
    }

    async fn items(
        &self,
        key: (CacheScope, Operation),
        fetch: impl Future<Output = Result<Vec<WorkItem>, DevOpsError>>,
    ) -> Result<Arc<Vec<WorkItem>>, DevOpsError> {
        if let Some(Cached::Items(items)) = self.cache.get(&key).await {
            return Ok(items);
        }
        let items = Arc::new(fetch.await?);
        self.cache.insert(key, Cached::Items(Arc::clone(&items))).await;
        Ok(items)
    }

    /// Open Epics. See [`get_epics`].
    ///
    /// # Errors
    ///
    /// Propagates [`DevOpsError`]; failures are not cached.
    pub async fn epics(&self, excluded: &StateSet) -> Result<Arc<Vec<WorkItem>>, DevOpsError> {
        let key = self.key(Operation::Epics {
            excluded: excluded.as_slice().to_vec(),
        });
        self.items(key, get_epics(self.api.as_ref(), excluded, self.limits))
            .await
    }

    /// Descendant tree of `root`. See [`resolve_hierarchy`].
    ///
    /// # Errors
    ///
    /// Propagates [`DevOpsError`]; failures are not cached.
    pub async fn hierarchy(&self, root: WorkItemId) -> Result<Arc<Hierarchy>, DevOpsError> {
        let key = self.key(Operation::Hierarchy(root));
        if let Some(Cached::Hierarchy(hierarchy)) = self.cache.get(&key).await {
            return Ok(hierarchy);
        }
        let hierarchy = Arc::new(resolve_hierarchy(self.api.as_ref(), root, self.limits).await?);
        self.cache
            .insert(key, Cached::Hierarchy(Arc::clone(&hierarchy)))
            .await;
        Ok(hierarchy)
    }

    /// Flattened descendants of `root`, root excluded.
    ///
    /// # Errors
    ///
    /// See [`Self::hierarchy`].
    pub async fn descendants(&self, root: WorkItemId) -> Result<Vec<WorkItemId>, DevOpsError> {
        Ok(self.hierarchy(root).await?.descendants())
    }

    /// Detail records for `ids`. The ID list is normalized (sorted,
    /// deduplicated), so any permutation hits the same entry.
    ///
    /// # Errors
    ///
    /// Propagates [`DevOpsError`]; failures are not cached.
    pub async fn details(&self, ids: &[WorkItemId]) -> Result<Arc<Vec<WorkItem>>, DevOpsError> {
        let mut normalized = ids.to_vec();
        normalized.sort_unstable();
        normalized.dedup();
        let key = self.key(Operation::Details(normalized.clone()));
        self.items(key, async {
            fetch_details(self.api.as_ref(), &normalized, self.limits).await
        })
        .await
    }

    /// Complete documents of every item matching `filter`. See
    /// [`get_work_items`].
    ///
    /// # Errors
    ///
    /// Propagates [`DevOpsError`]; failures are not cached.
    pub async fn open_tasks(
        &self,
        filter: &WorkItemFilter,
    ) -> Result<Arc<Vec<WorkItemRecord>>, DevOpsError> {
        let key = self.key(Operation::Tasks {
            predicate: filter.predicate(),
        });
        if let Some(Cached::Records(records)) = self.cache.get(&key).await {
            return Ok(records);
        }
        let records = Arc::new(get_work_items(self.api.as_ref(), filter, self.limits).await?);
        self.cache
            .insert(key, Cached::Records(Arc::clone(&records)))
            .await;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_hides_token_but_separates_scopes() {
        let a = CacheScope::new(&Credentials::new("https://dev.azure.com/acme", "Web", "token-a"));
        let b = CacheScope::new(&Credentials::new("https://dev.azure.com/acme", "Web", "token-b"));
        assert_ne!(a, b);
        assert_eq!(a.credential_fingerprint.len(), 16);
        assert!(!a.credential_fingerprint.contains("token"));
        let again = CacheScope::new(&Credentials::new("https://dev.azure.com/acme/", "Web", "token-a"));
        assert_eq!(a, again);
    }
}
