//! Paginated query engine.
//!
//! IDs are discovered by windowing on the monotonically increasing work item
//! ID (`id > cursor ORDER BY id`, one page at a time), then fetched in
//! fixed-size detail batches. Both steps are strictly sequential: each page's
//! cursor depends on the previous page, and detail batches are issued in
//! order so the concatenated result keeps per-batch ordering.

use kev_core::{ServiceLimits, StateSet, WorkItem, WorkItemId};

use crate::api::{DETAIL_FIELDS, FetchMode, IdPageRequest, SUMMARY_FIELDS, WorkItemApi};
use crate::error::DevOpsError;
use crate::wire::WorkItemRecord;

// ── Filters ────────────────────────────────────────────────────────

/// A work item filter, rendered into a WIQL predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemFilter {
    pub work_item_types: Vec<String>,
    pub excluded_states: Vec<String>,
    pub assigned_to_me: bool,
    /// Matches items under any of these area paths.
    pub area_paths: Vec<String>,
    /// Restrict to the project named in the request URL.
    pub project_scoped: bool,
}

impl WorkItemFilter {
    /// Tasks not in an excluded state, optionally only the caller's.
    #[must_use]
    pub fn open_tasks(excluded: &StateSet, area_paths: &[String], mine: bool) -> Self {
        Self {
            work_item_types: vec!["Task".to_string()],
            excluded_states: excluded.as_slice().to_vec(),
            assigned_to_me: mine,
            area_paths: area_paths.to_vec(),
            project_scoped: false,
        }
    }

    /// Epics of the current project not in an excluded state.
    #[must_use]
    pub fn open_epics(excluded: &StateSet) -> Self {
        Self {
            work_item_types: vec!["Epic".to_string()],
            excluded_states: excluded.as_slice().to_vec(),
            project_scoped: true,
            ..Self::default()
        }
    }

    /// Render the WIQL `WHERE` clause (without the paging condition).
    #[must_use]
    pub fn predicate(&self) -> String {
        let mut clauses = Vec::new();
        if self.project_scoped {
            clauses.push("[System.TeamProject] = @project".to_string());
        }
        match self.work_item_types.as_slice() {
            [] => {}
            [one] => clauses.push(format!("[System.WorkItemType] = {}", quote(one))),
            many => clauses.push(format!("[System.WorkItemType] IN ({})", quote_list(many))),
        }
        match self.excluded_states.as_slice() {
            [] => {}
            [one] => clauses.push(format!("[System.State] <> {}", quote(one))),
            many => clauses.push(format!("[System.State] NOT IN ({})", quote_list(many))),
        }
        if self.assigned_to_me {
            clauses.push("[System.AssignedTo] = @Me".to_string());
        }
        if !self.area_paths.is_empty() {
            let parts: Vec<String> = self
                .area_paths
                .iter()
                .map(|path| format!("[System.AreaPath] UNDER {}", quote(path)))
                .collect();
            clauses.push(format!("({})", parts.join(" OR ")));
        }
        if clauses.is_empty() {
            // every ID is positive, so this matches everything
            return "[System.Id] > 0".to_string();
        }
        clauses.join(" AND ")
    }
}

/// Quote a WIQL string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(",")
}

// ── Engine ─────────────────────────────────────────────────────────

/// Return every ID matching `predicate`, each exactly once, in ascending order.
///
/// Pages until the service returns an empty page.
///
/// # Errors
///
/// Propagates the first transport or HTTP error. Returns
/// [`DevOpsError::Parse`] if a page is not strictly ascending above the cursor,
/// since continuing would risk skipping or repeating IDs.
pub async fn paged_query(
    api: &dyn WorkItemApi,
    predicate: &str,
    limits: ServiceLimits,
) -> Result<Vec<WorkItemId>, DevOpsError> {
    let mut request = IdPageRequest {
        predicate: predicate.to_string(),
        after: None,
        top: limits.page_size(),
    };
    let mut all = Vec::new();
    loop {
        let page = api.query_ids(&request).await?;
        let Some(&last) = page.last() else {
            break;
        };
        let mut previous = request.after;
        for &id in &page {
            if previous.is_some_and(|p| id <= p) {
                return Err(DevOpsError::Parse(format!(
                    "query page out of order: {id} after {}",
                    previous.map_or(0, WorkItemId::get)
                )));
            }
            previous = Some(id);
        }
        tracing::debug!(page_len = page.len(), cursor = %last, "advanced query window");
        all.extend(page);
        request.after = Some(last);
    }
    Ok(all)
}

/// Fetch records for `ids` in batches of `limits.batch_size()`, concatenated
/// in request order. No call is made for an empty list.
///
/// # Errors
///
/// The first failing batch aborts the whole fetch; no partial result is
/// returned.
pub async fn detail_fetch(
    api: &dyn WorkItemApi,
    ids: &[WorkItemId],
    mode: FetchMode,
    limits: ServiceLimits,
) -> Result<Vec<WorkItemRecord>, DevOpsError> {
    let mut records = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(limits.batch_size()) {
        records.extend(api.fetch_items(chunk, mode).await?);
    }
    Ok(records)
}

/// Run `filter` to completion and return every matching item as the
/// complete document the service sent, every field included.
///
/// # Errors
///
/// See [`paged_query`] and [`detail_fetch`].
pub async fn get_work_items(
    api: &dyn WorkItemApi,
    filter: &WorkItemFilter,
    limits: ServiceLimits,
) -> Result<Vec<WorkItemRecord>, DevOpsError> {
    let ids = paged_query(api, &filter.predicate(), limits).await?;
    detail_fetch(api, &ids, FetchMode::AllFields, limits).await
}

/// Open tasks, optionally restricted to the given area paths.
///
/// # Errors
///
/// See [`get_work_items`].
pub async fn get_open_tasks(
    api: &dyn WorkItemApi,
    area_paths: &[String],
    excluded: &StateSet,
    limits: ServiceLimits,
) -> Result<Vec<WorkItemRecord>, DevOpsError> {
    get_work_items(
        api,
        &WorkItemFilter::open_tasks(excluded, area_paths, false),
        limits,
    )
    .await
}

/// Open tasks assigned to the token's owner.
///
/// # Errors
///
/// See [`get_work_items`].
pub async fn get_my_open_tasks(
    api: &dyn WorkItemApi,
    area_paths: &[String],
    excluded: &StateSet,
    limits: ServiceLimits,
) -> Result<Vec<WorkItemRecord>, DevOpsError> {
    get_work_items(
        api,
        &WorkItemFilter::open_tasks(excluded, area_paths, true),
        limits,
    )
    .await
}

/// Open Epics of the project with their summary fields.
///
/// The excluded set is applied twice: in the query, and again on the fetched
/// records, because an Epic can change state between the two calls.
///
/// # Errors
///
/// See [`paged_query`] and [`detail_fetch`].
pub async fn get_epics(
    api: &dyn WorkItemApi,
    excluded: &StateSet,
    limits: ServiceLimits,
) -> Result<Vec<WorkItem>, DevOpsError> {
    let ids = paged_query(api, &WorkItemFilter::open_epics(excluded).predicate(), limits).await?;
    let records = detail_fetch(api, &ids, FetchMode::Fields(SUMMARY_FIELDS), limits).await?;
    Ok(records
        .iter()
        .map(WorkItemRecord::to_work_item)
        .filter(|epic| !excluded.contains(&epic.state))
        .collect())
}

/// Detail fields (including timestamps) for `ids`.
///
/// # Errors
///
/// See [`detail_fetch`].
pub async fn fetch_details(
    api: &dyn WorkItemApi,
    ids: &[WorkItemId],
    limits: ServiceLimits,
) -> Result<Vec<WorkItem>, DevOpsError> {
    let records = detail_fetch(api, ids, FetchMode::Fields(DETAIL_FIELDS), limits).await?;
    Ok(records.iter().map(WorkItemRecord::to_work_item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn states(names: &[&str]) -> StateSet {
        StateSet::new(names.iter().map(ToString::to_string))
    }

    #[test]
    fn open_tasks_predicate_matches_cli_query() {
        let filter = WorkItemFilter::open_tasks(&states(&["Closed"]), &[], false);
        assert_eq!(
            filter.predicate(),
            "[System.WorkItemType] = 'Task' AND [System.State] <> 'Closed'"
        );
    }

    #[test]
    fn my_tasks_with_areas() {
        let areas = vec!["Web\\Team A".to_string(), "Web\\Team B".to_string()];
        let filter = WorkItemFilter::open_tasks(&states(&["Closed"]), &areas, true);
        assert_eq!(
            filter.predicate(),
            "[System.WorkItemType] = 'Task' AND [System.State] <> 'Closed' \
             AND [System.AssignedTo] = @Me \
             AND ([System.AreaPath] UNDER 'Web\\Team A' OR [System.AreaPath] UNDER 'Web\\Team B')"
        );
    }

    #[test]
    fn open_epics_predicate_is_project_scoped() {
        let filter = WorkItemFilter::open_epics(&states(&["Closed", "Cancelled", "Removed"]));
        assert_eq!(
            filter.predicate(),
            "[System.TeamProject] = @project AND [System.WorkItemType] = 'Epic' \
             AND [System.State] NOT IN ('Closed','Cancelled','Removed')"
        );
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(quote("O'Brien's"), "'O''Brien''s'");
        let filter = WorkItemFilter {
            area_paths: vec!["Team's".into()],
            ..WorkItemFilter::default()
        };
        assert_eq!(filter.predicate(), "([System.AreaPath] UNDER 'Team''s')");
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(WorkItemFilter::default().predicate(), "[System.Id] > 0");
    }

    #[test]
    fn multiple_types_use_in() {
        let filter = WorkItemFilter {
            work_item_types: vec!["Bug".into(), "Task".into()],
            ..WorkItemFilter::default()
        };
        assert_eq!(filter.predicate(), "[System.WorkItemType] IN ('Bug','Task')");
    }
}
