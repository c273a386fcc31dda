use crate::bootstrap::AppContext;
use crate::cli::GlobalFlags;
use crate::output::output_items;
use crate::progress::Progress;

/// Handle `kevops epics`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let excluded = ctx.config.states.discovery_excluded_set();

    let spinner = Progress::spinner("Discovering Epics");
    let result = ctx.session.epics(&excluded).await;
    spinner.settle(&result, "Epic discovery failed");

    output_items(&result?, flags.format)
}
