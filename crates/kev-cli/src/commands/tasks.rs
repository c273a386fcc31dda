use kev_devops::{WorkItemFilter, WorkItemRecord};

use crate::bootstrap::AppContext;
use crate::cli::{GlobalFlags, OutputFormat, TasksArgs};
use crate::output::{items_table, render, table_options};
use crate::progress::Progress;

/// Handle `kevops tasks`.
///
/// `--mine` and `--area` were folded into the configuration as explicit
/// overrides, so the effective values come from `ctx.config`.
pub async fn handle(args: &TasksArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let azure = &ctx.config.azure;
    let filter = WorkItemFilter::open_tasks(
        &ctx.config.states.task_excluded_set(),
        &azure.area_paths,
        azure.mine,
    );

    let spinner = Progress::spinner("Querying open tasks");
    let result = ctx.session.open_tasks(&filter).await;
    spinner.settle(&result, "Task query failed");
    let tasks = result?;

    if args.count {
        println!("{}", count_line(tasks.len()));
        return Ok(());
    }
    println!("{}", render_tasks(&tasks, flags.format)?);
    Ok(())
}

/// JSON and raw output carry the service documents untouched; the table
/// shows the usual summary columns.
fn render_tasks(tasks: &[WorkItemRecord], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Table {
        let items: Vec<_> = tasks.iter().map(WorkItemRecord::to_work_item).collect();
        return Ok(items_table(&items).render(table_options()));
    }
    render(&tasks, format)
}

fn count_line(count: usize) -> String {
    format!("{count} tasks")
}
