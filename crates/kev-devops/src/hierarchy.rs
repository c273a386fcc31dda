//! Breadth-first resolution of a work item's descendant tree.

use std::collections::{BTreeMap, HashSet, VecDeque};

use kev_core::{ServiceLimits, WorkItemId};
use serde::Serialize;

use crate::api::{FetchMode, WorkItemApi};
use crate::error::DevOpsError;
use crate::wire::parse_link_target;

/// A directed parent → child link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HierarchyEdge {
    pub parent: WorkItemId,
    pub child: WorkItemId,
}

/// Parent → children adjacency below one root.
///
/// Children keep discovery order and never repeat under the same parent. The
/// graph is expected to be a tree but nothing here relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    pub root: WorkItemId,
    pub children: BTreeMap<WorkItemId, Vec<WorkItemId>>,
}

impl Hierarchy {
    #[must_use]
    pub const fn new(root: WorkItemId) -> Self {
        Self {
            root,
            children: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn from_edges(root: WorkItemId, edges: impl IntoIterator<Item = HierarchyEdge>) -> Self {
        let mut hierarchy = Self::new(root);
        for edge in edges {
            hierarchy.add_edge(edge);
        }
        hierarchy
    }

    /// Record an edge. Returns `false` if it was already present.
    pub fn add_edge(&mut self, edge: HierarchyEdge) -> bool {
        let siblings = self.children.entry(edge.parent).or_default();
        if siblings.contains(&edge.child) {
            return false;
        }
        siblings.push(edge.child);
        true
    }

    #[must_use]
    pub fn children_of(&self, parent: WorkItemId) -> &[WorkItemId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn edges(&self) -> impl Iterator<Item = HierarchyEdge> + '_ {
        self.children.iter().flat_map(|(&parent, kids)| {
            kids.iter().map(move |&child| HierarchyEdge { parent, child })
        })
    }

    /// All descendants of the root. See [`flatten`].
    #[must_use]
    pub fn descendants(&self) -> Vec<WorkItemId> {
        flatten(&self.children, self.root)
    }
}

/// Every item reachable from `root`, each once, root excluded.
///
/// Depth-first with an explicit stack. The order is not meaningful; callers
/// re-sort by timestamp. A cycle back to the root or to a visited node is
/// ignored.
#[must_use]
pub fn flatten(
    children: &BTreeMap<WorkItemId, Vec<WorkItemId>>,
    root: WorkItemId,
) -> Vec<WorkItemId> {
    let mut seen = HashSet::from([root]);
    let mut out = Vec::new();
    let mut stack: Vec<WorkItemId> = children.get(&root).cloned().unwrap_or_default();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        out.push(id);
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().copied());
        }
    }
    out
}

/// Resolve the full descendant tree of `root`.
///
/// Breadth-first: up to `limits.batch_size()` queued items are expanded per
/// request, with relations. Every forward hierarchy link becomes an edge;
/// its target is queued the first time it is seen. Links whose target cannot
/// be parsed are skipped with a warning.
///
/// # Errors
///
/// The first transport or HTTP error aborts the traversal.
pub async fn resolve_hierarchy(
    api: &dyn WorkItemApi,
    root: WorkItemId,
    limits: ServiceLimits,
) -> Result<Hierarchy, DevOpsError> {
    let mut hierarchy = Hierarchy::new(root);
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);

    while !queue.is_empty() {
        let take = queue.len().min(limits.batch_size());
        let batch: Vec<WorkItemId> = queue.drain(..take).collect();
        let records = api.fetch_items(&batch, FetchMode::Relations).await?;
        tracing::debug!(
            expanded = batch.len(),
            queued = queue.len(),
            seen = seen.len(),
            "hierarchy batch"
        );

        for record in &records {
            for link in record.hierarchy_links() {
                let child = match parse_link_target(&link.url) {
                    Ok(child) => child,
                    Err(error) => {
                        tracing::warn!(parent = %record.id, %error, "skipping relation");
                        continue;
                    }
                };
                hierarchy.add_edge(HierarchyEdge {
                    parent: record.id,
                    child,
                });
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
        }
    }

    Ok(hierarchy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(raw: u32) -> WorkItemId {
        WorkItemId::new(raw).unwrap()
    }

    fn edge(parent: u32, child: u32) -> HierarchyEdge {
        HierarchyEdge {
            parent: id(parent),
            child: id(child),
        }
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut h = Hierarchy::new(id(1));
        assert!(h.add_edge(edge(1, 2)));
        assert!(!h.add_edge(edge(1, 2)));
        assert!(h.add_edge(edge(1, 3)));
        assert_eq!(h.children_of(id(1)), &[id(2), id(3)]);
        assert!(h.children_of(id(9)).is_empty());
    }

    #[test]
    fn flatten_excludes_root_and_visits_each_once() {
        // diamond: 1 -> {2,3}, 2 -> 4, 3 -> 4
        let h = Hierarchy::from_edges(id(1), [edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)]);
        let mut all = h.descendants();
        all.sort();
        assert_eq!(all, vec![id(2), id(3), id(4)]);
    }

    #[test]
    fn flatten_survives_cycles() {
        let h = Hierarchy::from_edges(id(1), [edge(1, 2), edge(2, 3), edge(3, 1), edge(3, 2)]);
        let mut all = h.descendants();
        all.sort();
        assert_eq!(all, vec![id(2), id(3)]);
    }

    #[test]
    fn leaf_root_has_no_descendants() {
        assert!(Hierarchy::new(id(5)).descendants().is_empty());
    }

    #[test]
    fn edges_round_trip_through_from_edges() {
        let h = Hierarchy::from_edges(id(1), [edge(1, 2), edge(2, 3)]);
        let rebuilt = Hierarchy::from_edges(id(1), h.edges());
        assert_eq!(rebuilt, h);
    }
}
