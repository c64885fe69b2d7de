//! Sales Performance Dashboard Core
//!
//! Data side of a single-page sales dashboard: loads a flat CSV of
//! salesperson rows, normalizes the schema, and serves derived views
//! (KPIs, executive ranking, regional rollup, support list) to an external
//! rendering collaborator.
//!
//! - `data`: CSV loading and schema normalization with Polars
//! - `records`: typed rows for the view layer
//! - `cache`: load-once table cache keyed by file modification time
//! - `views`: caller-owned read-only aggregations
//! - `format`: currency/percentage display helpers
//! - `api_server` (feature `api`): axum endpoints for the renderer

pub mod cache;
pub mod data;
pub mod error;
pub mod format;
pub mod records;
pub mod views;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use cache::DatasetCache;
pub use error::DashboardError;
pub use records::SalesRecord;
pub use views::{
    region_options, DashboardSnapshot, ExecutiveRanking, KpiSummary, RegionRollup,
    RegionSelection, ALL_REGIONS, DEFAULT_SUPPORT_THRESHOLD,
};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
