//! Dashboard data model, built from already-fetched items.

use chrono::{DateTime, Utc};
use kev_core::metrics::ranked;
use kev_core::work_item::{partition_by_state, sort_by_last_changed_desc};
use kev_core::{KpiSummary, StateSet, WorkItem, WorkItemId};
use serde::Serialize;

/// One bar of the "Epics by Area" chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaBar {
    pub area: String,
    pub count: usize,
    pub selected: bool,
}

/// One row of an epic's Active or Inactive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub id: WorkItemId,
    pub title: String,
    pub work_item_type: String,
    pub state: String,
    pub assigned_to: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicSection {
    pub id: WorkItemId,
    pub title: String,
    pub state: String,
    pub assigned_to: String,
    pub area_path: String,
    pub link: String,
    pub descendant_count: usize,
    pub active: Vec<ItemRow>,
    pub inactive: Vec<ItemRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub organization_url: String,
    pub project: String,
    pub selected_area: Option<String>,
    pub last_sync: DateTime<Utc>,
    pub kpis: KpiSummary,
    pub areas: Vec<AreaBar>,
    pub epics: Vec<EpicSection>,
}

/// Where the links point.
#[derive(Debug, Clone, Copy)]
pub struct LinkBase<'a> {
    pub organization_url: &'a str,
    pub project: &'a str,
}

impl LinkBase<'_> {
    fn row(&self, item: &WorkItem) -> ItemRow {
        ItemRow {
            id: item.id,
            title: item.title.clone(),
            work_item_type: item.work_item_type.clone(),
            state: item.state.clone(),
            assigned_to: item.assignee_label().to_string(),
            last_updated: item.changed,
            link: item.edit_url(self.organization_url, self.project),
        }
    }
}

/// Area counts over every open Epic, most Epics first.
#[must_use]
pub fn area_bars(epics: &[WorkItem], selected: Option<&str>) -> Vec<AreaBar> {
    ranked(epics.iter().map(WorkItem::area_label))
        .into_iter()
        .map(|entry| AreaBar {
            selected: selected == Some(entry.label.as_str()),
            area: entry.label,
            count: entry.count,
        })
        .collect()
}

/// Epics in the selected area, or all of them.
#[must_use]
pub fn select_epics<'a>(epics: &'a [WorkItem], selected: Option<&str>) -> Vec<&'a WorkItem> {
    epics
        .iter()
        .filter(|epic| selected.is_none_or(|area| epic.area_label() == area))
        .collect()
}

/// One epic's descendants, newest change first, split by the final states.
#[must_use]
pub fn epic_section(
    epic: &WorkItem,
    descendants: &[WorkItem],
    final_states: &StateSet,
    links: LinkBase<'_>,
) -> EpicSection {
    let mut sorted = descendants.to_vec();
    sort_by_last_changed_desc(&mut sorted);
    let (active, inactive) = partition_by_state(&sorted, final_states);
    EpicSection {
        id: epic.id,
        title: epic.title.clone(),
        state: epic.state.clone(),
        assigned_to: epic.assignee_label().to_string(),
        area_path: epic.area_label().to_string(),
        link: epic.edit_url(links.organization_url, links.project),
        descendant_count: sorted.len(),
        active: active.into_iter().map(|item| links.row(item)).collect(),
        inactive: inactive.into_iter().map(|item| links.row(item)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    const LINKS: LinkBase<'static> = LinkBase {
        organization_url: "https://dev.azure.com/acme",
        project: "Web",
    };

    fn item(id: u32, state: &str, area: &str, changed_day: Option<u32>) -> WorkItem {
        WorkItem {
            id: WorkItemId::new(id).unwrap(),
            title: format!("Item {id}"),
            work_item_type: "Feature".into(),
            state: state.into(),
            assigned_to: None,
            area_path: area.into(),
            created: None,
            changed: changed_day.map(|d| Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn area_bars_count_unspecified_and_mark_selection() {
        let epics = vec![
            item(1, "Active", "Web\\Payments", None),
            item(2, "New", "Web\\Payments", None),
            item(3, "Active", "", None),
        ];
        let bars = area_bars(&epics, Some("Unspecified"));
        assert_eq!(
            bars,
            vec![
                AreaBar {
                    area: "Web\\Payments".into(),
                    count: 2,
                    selected: false
                },
                AreaBar {
                    area: "Unspecified".into(),
                    count: 1,
                    selected: true
                },
            ]
        );
        let chosen: Vec<u32> = select_epics(&epics, Some("Unspecified"))
            .iter()
            .map(|e| e.id.get())
            .collect();
        assert_eq!(chosen, vec![3]);
        assert_eq!(select_epics(&epics, None).len(), 3);
    }

    #[test]
    fn sections_sort_newest_first_and_split_by_final_state() {
        let epic = item(1, "Active", "Web", None);
        let children = vec![
            item(10, "Active", "Web", Some(1)),
            item(11, "Closed", "Web", Some(5)),
            item(12, "New", "Web", Some(9)),
            item(13, "Removed", "Web", Some(2)),
        ];
        let section = epic_section(&epic, &children, &StateSet::final_states(), LINKS);

        let active: Vec<u32> = section.active.iter().map(|r| r.id.get()).collect();
        let inactive: Vec<u32> = section.inactive.iter().map(|r| r.id.get()).collect();
        assert_eq!(active, vec![12, 10]);
        assert_eq!(inactive, vec![11, 13]);
        assert_eq!(section.descendant_count, 4);
        assert_eq!(section.active[0].assigned_to, "Unassigned");
        assert_eq!(
            section.active[0].link,
            "https://dev.azure.com/acme/Web/_workitems/edit/12"
        );
    }
}
