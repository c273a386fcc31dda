pub mod dashboard;
pub mod epics;
pub mod glossary;
pub mod hierarchy;
pub mod tasks;

use crate::bootstrap::{self, AppContext};
use crate::cli::{Commands, GlobalFlags};

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    if matches!(command, Commands::Glossary) {
        return glossary::handle(flags);
    }

    let explicit = bootstrap::explicit_overrides(&command, flags);
    let config = bootstrap::load_config(&explicit).await?;
    let ctx = AppContext::connect(config)?;

    match command {
        Commands::Tasks(args) => tasks::handle(&args, &ctx, flags).await,
        Commands::Epics => epics::handle(&ctx, flags).await,
        Commands::Hierarchy(args) => hierarchy::handle(&args, &ctx, flags).await,
        Commands::Dashboard(args) => dashboard::handle(&args, &ctx, flags).await,
        Commands::Glossary => glossary::handle(flags),
    }
}
