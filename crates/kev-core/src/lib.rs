//! # kev-core
//!
//! Core types and pure aggregation logic for KevOps.
//!
//! This crate provides the foundational types shared across all KevOps crates:
//! - Work item identifiers and immutable work item snapshots
//! - Service ceilings and effective page/batch limits
//! - The state taxonomy (final vs. open states, discovery exclusions)
//! - Connection credentials with a redacting `Debug`
//! - KPI aggregation over a resolved detail set
//! - The KPI glossary shown by the dashboard
//! - Cross-cutting error types

pub mod credentials;
pub mod errors;
pub mod glossary;
pub mod ids;
pub mod limits;
pub mod metrics;
pub mod states;
pub mod work_item;

pub use credentials::Credentials;
pub use errors::CoreError;
pub use ids::WorkItemId;
pub use limits::ServiceLimits;
pub use metrics::KpiSummary;
pub use states::StateSet;
pub use work_item::WorkItem;
