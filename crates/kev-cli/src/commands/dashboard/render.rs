//! Plain-text dashboard.

use std::fmt::Write as _;

use kev_core::metrics::CountEntry;

use super::report::{AreaBar, DashboardReport, EpicSection, ItemRow};
use crate::output::table::{Table, TableOptions};

pub const NO_EPICS: &str = "No open Epics found.";
pub const NO_LINKED_ITEMS: &str = "No linked items";
const ALL_AREAS: &str = "<All Areas>";
const BAR_WIDTH: usize = 30;

/// Render the whole dashboard. An empty Epic list renders only [`NO_EPICS`].
#[must_use]
pub fn render_text(report: &DashboardReport, options: TableOptions) -> String {
    if report.areas.is_empty() {
        return NO_EPICS.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "KevOps Dashboard: {}/{}", report.organization_url, report.project);
    let _ = writeln!(
        out,
        "Area Path: {}",
        report.selected_area.as_deref().unwrap_or(ALL_AREAS)
    );
    out.push('\n');
    out.push_str(&kpi_banner(report, options));
    out.push_str("\n\n");

    let _ = writeln!(out, "Epics by Area");
    out.push_str(&area_chart(&report.areas));
    out.push('\n');

    let _ = writeln!(out, "Epic Hierarchy");
    for epic in &report.epics {
        out.push('\n');
        out.push_str(&epic_block(epic, options));
    }
    out.trim_end().to_string()
}

fn kpi_banner(report: &DashboardReport, options: TableOptions) -> String {
    let kpis = &report.kpis;
    let mut counts = Table::new(&[
        "Total Items",
        "Open Items",
        "Closed Items",
        "% Complete",
        "New (7d)",
        "Closed (7d)",
    ]);
    counts.push(vec![
        thousands(kpis.total),
        thousands(kpis.open),
        thousands(kpis.closed),
        format!("{:.1}%", kpis.pct_complete),
        thousands(kpis.new_last_7d),
        thousands(kpis.closed_last_7d),
    ]);
    let mut durations = Table::new(&["Avg Cycle (days)", "Max Age (days)", "Avg Age (days)"]);
    durations.push(vec![
        format!("{:.1}", kpis.avg_cycle_days),
        kpis.max_age_days.to_string(),
        format!("{:.1}", kpis.avg_age_days),
    ]);

    let mut out = String::new();
    let _ = writeln!(out, "{}", counts.render(options));
    out.push('\n');
    let _ = writeln!(out, "{}", durations.render(options));
    out.push('\n');
    let _ = writeln!(out, "Type Breakdown: {}", joined(&kpis.type_breakdown, false));
    let _ = writeln!(out, "Top Assignees: {}", joined(&kpis.top_assignees, true));
    let _ = write!(
        out,
        "Last Sync: {}",
        report.last_sync.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

fn joined(entries: &[CountEntry], parenthesized: bool) -> String {
    if entries.is_empty() {
        return "-".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            if parenthesized {
                format!("{} ({})", entry.label, thousands(entry.count))
            } else {
                format!("{}: {}", entry.label, thousands(entry.count))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn area_chart(bars: &[AreaBar]) -> String {
    let label_width = bars.iter().map(|b| b.area.chars().count()).max().unwrap_or(0);
    let longest = bars.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut out = String::new();
    for bar in bars {
        let marker = if bar.selected { '>' } else { ' ' };
        let filled = (bar.count * BAR_WIDTH).div_ceil(longest);
        let _ = writeln!(
            out,
            "{marker} {:<label_width$}  {} {}",
            bar.area,
            "#".repeat(filled),
            bar.count
        );
    }
    out
}

fn epic_block(epic: &EpicSection, options: TableOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Epic {}: {} [{}]", epic.id, epic.title, epic.state);
    let _ = writeln!(out, "  {}  {}", epic.area_path, epic.link);
    if epic.descendant_count == 0 {
        let _ = writeln!(out, "  {NO_LINKED_ITEMS}");
        return out;
    }
    for (heading, rows) in [
        ("Active Work Items", &epic.active),
        ("Inactive Work Items", &epic.inactive),
    ] {
        let _ = writeln!(out, "  {heading}");
        if rows.is_empty() {
            let _ = writeln!(out, "  None");
            continue;
        }
        for line in item_table(rows).render(options).lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

fn item_table(rows: &[ItemRow]) -> Table {
    let mut table = Table::new(&["Title", "Type", "State", "Assigned To", "Last Updated", "Link"]);
    for row in rows {
        table.push(vec![
            row.title.clone(),
            row.work_item_type.clone(),
            row.state.clone(),
            row.assigned_to.clone(),
            row.last_updated.map_or_else(
                || "-".to_string(),
                |at| at.format("%Y-%m-%d %H:%M").to_string(),
            ),
            row.link.clone(),
        ]);
    }
    table
}

/// `1234567` → `1,234,567`.
#[must_use]
pub fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use kev_core::{KpiSummary, StateSet, WorkItemId};

    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn report(areas: Vec<AreaBar>, epics: Vec<EpicSection>) -> DashboardReport {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 5, 0).unwrap();
        DashboardReport {
            organization_url: "https://dev.azure.com/acme".into(),
            project: "Web".into(),
            selected_area: None,
            last_sync: now,
            kpis: KpiSummary::compute(&[], &StateSet::final_states(), now),
            areas,
            epics,
        }
    }

    fn empty_epic(id: u32) -> EpicSection {
        EpicSection {
            id: WorkItemId::new(id).unwrap(),
            title: "Payments revamp".into(),
            state: "Active".into(),
            assigned_to: "Unassigned".into(),
            area_path: "Web\\Payments".into(),
            link: format!("https://dev.azure.com/acme/Web/_workitems/edit/{id}"),
            descendant_count: 0,
            active: Vec::new(),
            inactive: Vec::new(),
        }
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn no_epics_message() {
        assert_eq!(render_text(&report(vec![], vec![]), PLAIN), NO_EPICS);
    }

    #[test]
    fn epic_without_children_says_so() {
        let bars = vec![AreaBar {
            area: "Web\\Payments".into(),
            count: 1,
            selected: false,
        }];
        let out = render_text(&report(bars, vec![empty_epic(7)]), PLAIN);
        assert!(out.contains("Epic 7: Payments revamp [Active]"));
        assert!(out.contains(NO_LINKED_ITEMS));
        assert!(out.contains("Last Sync: 2025-03-10 09:05 UTC"));
        assert!(out.contains("0.0%"));
        assert!(out.contains("Area Path: <All Areas>"));
    }

    #[test]
    fn area_chart_marks_selection_and_scales() {
        let chart = area_chart(&[
            AreaBar {
                area: "Web\\A".into(),
                count: 4,
                selected: false,
            },
            AreaBar {
                area: "Web\\Bee".into(),
                count: 2,
                selected: true,
            },
        ]);
        let lines: Vec<&str> = chart.lines().collect();
        assert!(lines[0].starts_with("  Web\\A    "));
        assert!(lines[0].ends_with(&format!("{} 4", "#".repeat(30))));
        assert!(lines[1].starts_with("> Web\\Bee  "));
        assert!(lines[1].ends_with(&format!("{} 2", "#".repeat(15))));
    }
}
