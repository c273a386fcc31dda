//! `kevops dashboard`: Epic discovery, hierarchy resolution, KPIs.

pub mod render;
pub mod report;

use std::collections::{BTreeSet, HashMap};

use anyhow::Context;
use chrono::Utc;
use kev_core::{KpiSummary, WorkItem, WorkItemId};

use crate::bootstrap::AppContext;
use crate::cli::{DashboardArgs, GlobalFlags, OutputFormat};
use crate::output::{output, table_options};
use crate::progress::Progress;
use report::{DashboardReport, LinkBase, area_bars, epic_section, select_epics};

/// Handle `kevops dashboard`.
///
/// Details are fetched once, for the union of every selected Epic's
/// descendants; the per-epic tables are cut from that set.
pub async fn handle(
    args: &DashboardArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spinner = Progress::spinner("Loading dashboard");
    let result = build(args, ctx, &spinner).await;
    spinner.settle(&result, "Dashboard failed");
    let report = result?;

    match flags.format {
        OutputFormat::Table => {
            println!("{}", render::render_text(&report, table_options()));
            Ok(())
        }
        format => output(&report, format),
    }
}

async fn build(
    args: &DashboardArgs,
    ctx: &AppContext,
    spinner: &Progress,
) -> anyhow::Result<DashboardReport> {
    let states = &ctx.config.states;
    let final_states = states.final_set();
    let session = &ctx.session;
    let selected = args.area_path.as_deref();
    let links = LinkBase {
        organization_url: ctx.organization_url(),
        project: ctx.project(),
    };

    let epics = session
        .epics(&states.discovery_excluded_set())
        .await
        .context("failed to discover Epics")?;
    let chosen = select_epics(&epics, selected);
    tracing::debug!(epics = epics.len(), chosen = chosen.len(), "epics discovered");

    let mut per_epic = Vec::with_capacity(chosen.len());
    let mut all_ids = BTreeSet::new();
    for epic in &chosen {
        spinner.set_message(&format!("Resolving Epic {}", epic.id));
        let descendants = session
            .descendants(epic.id)
            .await
            .with_context(|| format!("failed to resolve the hierarchy of Epic {}", epic.id))?;
        all_ids.extend(descendants.iter().copied());
        per_epic.push((*epic, descendants));
    }

    spinner.set_message(&format!("Fetching {} work items", all_ids.len()));
    let all_ids: Vec<WorkItemId> = all_ids.into_iter().collect();
    let details = session.details(&all_ids).await?;
    let now = Utc::now();
    let kpis = KpiSummary::compute(&details, &final_states, now);

    let by_id: HashMap<WorkItemId, &WorkItem> =
        details.iter().map(|item| (item.id, item)).collect();
    let sections = per_epic
        .into_iter()
        .map(|(epic, descendants)| {
            let items: Vec<WorkItem> = descendants
                .iter()
                .filter_map(|id| by_id.get(id).map(|item| (*item).clone()))
                .collect();
            epic_section(epic, &items, &final_states, links)
        })
        .collect();

    Ok(DashboardReport {
        organization_url: links.organization_url.to_string(),
        project: links.project.to_string(),
        selected_area: args.area_path.clone(),
        last_sync: now,
        kpis,
        areas: area_bars(&epics, selected),
        epics: sections,
    })
}
