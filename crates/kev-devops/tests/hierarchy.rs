//! Breadth-first hierarchy resolution against the in-memory service.

use std::collections::BTreeSet;

use kev_core::{ServiceLimits, WorkItemId};
use kev_devops::mock::{MockCall, MockWorkItemApi};
use kev_devops::{FetchMode, flatten, resolve_hierarchy};
use pretty_assertions::assert_eq;

fn id(raw: u32) -> WorkItemId {
    WorkItemId::new(raw).unwrap()
}

/// Heap-numbered binary tree: node `p` has children `2p` and `2p + 1`.
fn binary_tree(depth: u32) -> MockWorkItemApi {
    let last_parent = (1_u32 << depth) - 1;
    let targets: Vec<(u32, String)> = (1..=last_parent)
        .flat_map(|p| [(p, (2 * p).to_string()), (p, (2 * p + 1).to_string())])
        .collect();
    let links: Vec<(u32, &str)> = targets.iter().map(|(p, t)| (*p, t.as_str())).collect();
    MockWorkItemApi::new().with_links(&links)
}

#[tokio::test]
async fn depth_three_binary_tree_has_fourteen_descendants() {
    let api = binary_tree(3);

    let hierarchy = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    let found: BTreeSet<WorkItemId> = hierarchy.descendants().into_iter().collect();
    let expected: BTreeSet<WorkItemId> = (2..=15).map(id).collect();
    assert_eq!(found, expected);
    assert_eq!(hierarchy.descendants().len(), 14);

    for parent in 1..=7 {
        assert_eq!(
            hierarchy.children_of(id(parent)),
            &[id(2 * parent), id(2 * parent + 1)]
        );
    }
    assert!(hierarchy.children_of(id(8)).is_empty());
    assert_eq!(hierarchy.edges().count(), 14);
}

#[tokio::test]
async fn traversal_is_breadth_first_one_level_per_call() {
    let api = binary_tree(3);

    resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    let levels: Vec<Vec<u32>> = api
        .fetch_calls()
        .await
        .into_iter()
        .map(|batch| batch.into_iter().map(WorkItemId::get).collect())
        .collect();
    assert_eq!(
        levels,
        vec![
            vec![1],
            vec![2, 3],
            vec![4, 5, 6, 7],
            vec![8, 9, 10, 11, 12, 13, 14, 15],
        ]
    );
    assert!(api.calls().await.iter().all(|call| matches!(
        call,
        MockCall::Fetch {
            mode: FetchMode::Relations,
            ..
        }
    )));
}

#[tokio::test]
async fn flatten_is_idempotent() {
    let api = binary_tree(3);
    let hierarchy = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    let first: BTreeSet<WorkItemId> = flatten(&hierarchy.children, id(1)).into_iter().collect();
    let second: BTreeSet<WorkItemId> = flatten(&hierarchy.children, id(1)).into_iter().collect();
    assert_eq!(first, second);

    // flattening a subtree only yields that subtree
    let subtree: BTreeSet<u32> = flatten(&hierarchy.children, id(2))
        .into_iter()
        .map(WorkItemId::get)
        .collect();
    assert_eq!(subtree, BTreeSet::from([4, 5, 8, 9, 10, 11]));
}

#[tokio::test]
async fn malformed_links_are_skipped() {
    let api = MockWorkItemApi::new().with_links(&[(1, "2"), (1, "not-a-number"), (1, ""), (1, "3")]);

    let hierarchy = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    assert_eq!(hierarchy.children_of(id(1)), &[id(2), id(3)]);
}

#[tokio::test]
async fn cycles_terminate() {
    let api = MockWorkItemApi::new().with_links(&[(1, "2"), (2, "3"), (3, "1"), (3, "2")]);

    let hierarchy = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    let mut found = hierarchy.descendants();
    found.sort();
    assert_eq!(found, vec![id(2), id(3)]);
    // each node is expanded exactly once
    assert_eq!(api.fetch_calls().await.len(), 3);
}

#[tokio::test]
async fn wide_levels_are_split_into_batches() {
    let targets: Vec<String> = (2..=451).map(|c: u32| c.to_string()).collect();
    let links: Vec<(u32, &str)> = targets.iter().map(|t| (1, t.as_str())).collect();
    let api = MockWorkItemApi::new().with_links(&links);

    let hierarchy = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap();

    assert_eq!(hierarchy.descendants().len(), 450);
    let sizes: Vec<usize> = api.fetch_calls().await.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1, 200, 200, 50]);
}

#[tokio::test]
async fn fetch_failure_aborts_traversal() {
    let api = binary_tree(3).fail_fetch_on(3);

    let err = resolve_hierarchy(&api, id(1), ServiceLimits::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(api.fetch_calls().await.len(), 3);
}
