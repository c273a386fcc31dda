use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, DashboardArgs, HierarchyArgs, TasksArgs};

/// Top-level CLI parser for the `kevops` binary.
#[derive(Debug, Parser)]
#[command(
    name = "kevops",
    version,
    about = "KevOps - Azure DevOps Epic hierarchy and KPI explorer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw [default: table for dashboard and
    /// glossary, json otherwise]
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Organization URL (overrides config, env, and secrets)
    #[arg(long, global = true)]
    pub org_url: Option<String>,

    /// Project name (overrides config, env, and secrets)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Personal access token (overrides config, env, and secrets)
    #[arg(long, global = true)]
    pub pat: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format.unwrap_or_else(|| self.command.default_format()),
            quiet: self.quiet,
            verbose: self.verbose,
            org_url: self.org_url.clone(),
            project: self.project.clone(),
            pat: self.pat.clone(),
        }
    }
}
