use clap::{Args, Subcommand};
use kev_core::WorkItemId;

use super::OutputFormat;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List open tasks, optionally only your own or under given area paths
    Tasks(TasksArgs),
    /// List open Epics of the project
    Epics,
    /// Resolve the descendant tree of one work item
    Hierarchy(HierarchyArgs),
    /// Epic KPI dashboard
    Dashboard(DashboardArgs),
    /// Print the KPI business definitions
    Glossary,
}

impl Commands {
    /// Output format when `--format` is not given.
    #[must_use]
    pub const fn default_format(&self) -> OutputFormat {
        match self {
            Self::Dashboard(_) | Self::Glossary => OutputFormat::Table,
            Self::Tasks(_) | Self::Epics | Self::Hierarchy(_) => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Organization URL, e.g. https://dev.azure.com/acme
    #[arg(value_name = "ORGANIZATION_URL")]
    pub organization_url: Option<String>,

    /// Project name
    #[arg(value_name = "PROJECT")]
    pub project_name: Option<String>,

    /// Personal access token
    #[arg(value_name = "PAT")]
    pub token: Option<String>,

    /// Only tasks assigned to @Me
    #[arg(long)]
    pub mine: bool,

    /// Print only the number of tasks
    #[arg(long)]
    pub count: bool,

    /// Area path filter (repeatable; matches items UNDER any of them)
    #[arg(long = "area", value_name = "AREA")]
    pub areas: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HierarchyArgs {
    /// Root work item ID
    #[arg(value_name = "ROOT_ID")]
    pub root: WorkItemId,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Only show Epics in this area path
    #[arg(long)]
    pub area_path: Option<String>,
}
