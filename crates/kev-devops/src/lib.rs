//! # kev-devops
//!
//! Azure DevOps work item access for KevOps.
//!
//! - [`query`]: the paginated query engine. IDs are paged on an exclusive
//!   `id > cursor` window under the service's per-query ceiling, and details
//!   are fetched in batches under the per-request ceiling.
//! - [`hierarchy`]: breadth-first resolution of an item's descendant tree
//!   through forward hierarchy links, with seen-set cycle protection.
//! - [`session`]: per-render memoization keyed by scope and operation.
//! - [`DevOpsClient`]: the reqwest implementation of the [`WorkItemApi`] seam.
//! - [`mock`]: an in-memory implementation for tests.
//!
//! Everything is read-only. Transport and HTTP errors abort the operation in
//! progress and are never retried.

pub mod api;
pub mod client;
pub mod hierarchy;
pub mod mock;
pub mod query;
pub mod session;
pub mod wire;

mod error;
mod http;

pub use api::{FetchMode, IdPageRequest, WorkItemApi};
pub use client::{ClientSettings, DevOpsClient};
pub use error::DevOpsError;
pub use hierarchy::{Hierarchy, HierarchyEdge, flatten, resolve_hierarchy};
pub use query::{
    WorkItemFilter, detail_fetch, fetch_details, get_epics, get_my_open_tasks, get_open_tasks,
    get_work_items, paged_query,
};
pub use session::{CacheScope, RenderSession};
pub use wire::WorkItemRecord;
