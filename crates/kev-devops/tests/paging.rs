//! Query engine paging and detail batching against the in-memory service.

use kev_core::{ServiceLimits, StateSet, WorkItemId};
use kev_devops::mock::MockWorkItemApi;
use kev_devops::{
    DevOpsError, FetchMode, WorkItemRecord, detail_fetch, get_epics, get_my_open_tasks,
    get_open_tasks, paged_query,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<WorkItemId> {
    range.filter_map(WorkItemId::new).collect()
}

fn task(id: u32, title: &str) -> WorkItemRecord {
    WorkItemRecord::new(WorkItemId::new(id).unwrap())
        .with_field("System.Title", title)
        .with_field("System.WorkItemType", "Task")
        .with_field("System.State", "Active")
}

#[rstest]
#[case::empty(0, 1)]
#[case::single(1, 2)]
#[case::just_under_ceiling(19_999, 2)]
#[case::exactly_ceiling(20_000, 2)]
#[case::just_over_ceiling(20_001, 3)]
#[tokio::test]
async fn every_id_is_returned_exactly_once(#[case] total: u32, #[case] expected_calls: usize) {
    let matching = ids(1..=total);
    let api = MockWorkItemApi::new().with_query_ids(matching.clone());

    let found = paged_query(&api, "[System.Id] > 0", ServiceLimits::default())
        .await
        .unwrap();

    assert_eq!(found.len(), matching.len());
    assert_eq!(found, matching);
    assert_eq!(api.query_calls().await.len(), expected_calls);
}

#[tokio::test]
async fn cursor_strictly_increases_between_pages() {
    let api = MockWorkItemApi::new().with_query_ids(ids(1..=25));
    let limits = ServiceLimits::new(10, 200).unwrap();

    paged_query(&api, "[System.Id] > 0", limits).await.unwrap();

    let cursors: Vec<u32> = api
        .query_calls()
        .await
        .iter()
        .map(|call| call.after.map_or(0, WorkItemId::get))
        .collect();
    assert_eq!(cursors, vec![0, 10, 20, 25]);
    assert!(api.query_calls().await.iter().all(|call| call.top == 10));
}

#[tokio::test]
async fn sparse_ids_on_the_page_boundary_are_not_duplicated() {
    let sparse: Vec<WorkItemId> = [5, 10, 15, 20, 25, 30]
        .into_iter()
        .filter_map(WorkItemId::new)
        .collect();
    let api = MockWorkItemApi::new().with_query_ids(sparse.clone());
    let limits = ServiceLimits::new(3, 200).unwrap();

    let found = paged_query(&api, "[System.Id] > 0", limits).await.unwrap();
    assert_eq!(found, sparse);
}

#[tokio::test]
async fn query_failure_aborts_paging() {
    let api = MockWorkItemApi::new()
        .with_query_ids(ids(1..=30))
        .fail_query_on(2);
    let limits = ServiceLimits::new(10, 200).unwrap();

    let err = paged_query(&api, "[System.Id] > 0", limits).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[rstest]
#[case(0, 0)]
#[case(3, 1)]
#[case(200, 1)]
#[case(201, 2)]
#[case(450, 3)]
#[tokio::test]
async fn detail_fetch_uses_ceil_n_over_batch_calls(#[case] n: u32, #[case] calls: usize) {
    let wanted = ids(1..=n);
    let api = MockWorkItemApi::new().with_records(wanted.iter().map(|id| WorkItemRecord::new(*id)));

    let records = detail_fetch(&api, &wanted, FetchMode::AllFields, ServiceLimits::default())
        .await
        .unwrap();

    assert_eq!(api.fetch_calls().await.len(), calls);
    let returned: Vec<WorkItemId> = records.iter().map(|r| r.id).collect();
    assert_eq!(returned, wanted);
    assert!(api.fetch_calls().await.iter().all(|chunk| chunk.len() <= 200));
}

#[tokio::test]
async fn detail_fetch_preserves_request_order_within_chunks() {
    let wanted: Vec<WorkItemId> = [9, 3, 7, 1].into_iter().filter_map(WorkItemId::new).collect();
    let api = MockWorkItemApi::new().with_records(wanted.iter().map(|id| WorkItemRecord::new(*id)));
    let limits = ServiceLimits::new(100, 3).unwrap();

    let records = detail_fetch(&api, &wanted, FetchMode::AllFields, limits)
        .await
        .unwrap();

    let returned: Vec<WorkItemId> = records.iter().map(|r| r.id).collect();
    assert_eq!(returned, wanted);
    assert_eq!(api.fetch_calls().await.len(), 2);
}

#[tokio::test]
async fn a_failing_chunk_fails_the_whole_fetch() {
    let wanted = ids(1..=450);
    let api = MockWorkItemApi::new()
        .with_records(wanted.iter().map(|id| WorkItemRecord::new(*id)))
        .fail_fetch_on(2);

    let err = detail_fetch(&api, &wanted, FetchMode::AllFields, ServiceLimits::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DevOpsError::Http { status: 500, .. }));
    // the third chunk is never requested
    assert_eq!(api.fetch_calls().await.len(), 2);
}

#[tokio::test]
async fn open_tasks_end_to_end() {
    let api = MockWorkItemApi::new()
        .with_query_ids(ids(1..=3))
        .with_records([task(1, "Write docs"), task(2, "Fix login"), task(3, "Ship it")]);

    let tasks = get_open_tasks(&api, &[], &StateSet::task_excluded(), ServiceLimits::default())
        .await
        .unwrap();

    let titles: Vec<String> = tasks.iter().map(|t| t.to_work_item().title).collect();
    assert_eq!(titles, vec!["Write docs", "Fix login", "Ship it"]);
    assert_eq!(api.fetch_calls().await.len(), 1);

    let first_query = &api.query_calls().await[0];
    assert_eq!(
        first_query.predicate,
        "[System.WorkItemType] = 'Task' AND [System.State] <> 'Closed'"
    );
}

#[tokio::test]
async fn open_tasks_keep_every_field_of_the_document() {
    let api = MockWorkItemApi::new().with_query_ids(ids(1..=1)).with_record(
        task(1, "Triage")
            .with_field("System.Tags", "urgent")
            .with_field("Microsoft.VSTS.Scheduling.RemainingWork", 3),
    );

    let tasks = get_open_tasks(&api, &[], &StateSet::task_excluded(), ServiceLimits::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&tasks).unwrap();
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["fields"]["System.Tags"], "urgent");
    assert_eq!(json[0]["fields"]["Microsoft.VSTS.Scheduling.RemainingWork"], 3);
    assert!(json[0].get("relations").is_none());
    assert!(matches!(
        api.calls().await.last(),
        Some(kev_devops::mock::MockCall::Fetch {
            mode: FetchMode::AllFields,
            ..
        })
    ));
}

#[tokio::test]
async fn my_open_tasks_query_for_me_under_areas() {
    let api = MockWorkItemApi::new();
    let areas = vec!["Web\\Team A".to_string()];

    let tasks = get_my_open_tasks(&api, &areas, &StateSet::task_excluded(), ServiceLimits::default())
        .await
        .unwrap();

    assert!(tasks.is_empty());
    let predicate = &api.query_calls().await[0].predicate;
    assert!(predicate.contains("[System.AssignedTo] = @Me"));
    assert!(predicate.ends_with("([System.AreaPath] UNDER 'Web\\Team A')"));
    // nothing matched, so no detail request was made
    assert!(api.fetch_calls().await.is_empty());
}

#[tokio::test]
async fn epics_drop_excluded_states_after_fetch() {
    let epic = |id: u32, state: &str| {
        WorkItemRecord::new(WorkItemId::new(id).unwrap())
            .with_field("System.WorkItemType", "Epic")
            .with_field("System.State", state)
    };
    let api = MockWorkItemApi::new()
        .with_query_ids(ids(1..=3))
        .with_records([epic(1, "Active"), epic(2, "Removed"), epic(3, "New")]);

    let epics = get_epics(&api, &StateSet::discovery_excluded(), ServiceLimits::default())
        .await
        .unwrap();

    let kept: Vec<u32> = epics.iter().map(|e| e.id.get()).collect();
    assert_eq!(kept, vec![1, 3]);
    assert!(matches!(
        api.calls().await.last(),
        Some(kev_devops::mock::MockCall::Fetch {
            mode: FetchMode::Fields(_),
            ..
        })
    ));
}
