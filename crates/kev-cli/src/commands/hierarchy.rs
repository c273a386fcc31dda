use kev_core::WorkItemId;
use kev_devops::{Hierarchy, HierarchyEdge};
use serde::Serialize;

use crate::bootstrap::AppContext;
use crate::cli::{GlobalFlags, HierarchyArgs, OutputFormat};
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct HierarchyView {
    root: WorkItemId,
    descendant_count: usize,
    descendants: Vec<WorkItemId>,
    edges: Vec<HierarchyEdge>,
}

impl From<&Hierarchy> for HierarchyView {
    fn from(hierarchy: &Hierarchy) -> Self {
        let mut descendants = hierarchy.descendants();
        descendants.sort_unstable();
        Self {
            root: hierarchy.root,
            descendant_count: descendants.len(),
            descendants,
            edges: hierarchy.edges().collect(),
        }
    }
}

/// Handle `kevops hierarchy <ROOT_ID>`.
pub async fn handle(
    args: &HierarchyArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spinner = Progress::spinner(&format!("Resolving hierarchy of {}", args.root));
    let result = ctx.session.hierarchy(args.root).await;
    spinner.settle(&result, "Hierarchy resolution failed");
    let view = HierarchyView::from(result?.as_ref());

    // a table of edges reads better than a nested object
    if flags.format == OutputFormat::Table {
        return output(&view.edges, flags.format);
    }
    output(&view, flags.format)
}
