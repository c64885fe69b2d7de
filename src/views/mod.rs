//! Derived read-only views
//!
//! Everything here is computed by the caller from the immutable cached
//! table; no view mutates its input or touches the source file.
//!
//! - `filter`: region selection with the "All Regions" sentinel
//! - `kpi`: summary aggregates over the filtered rows
//! - `ranking`: top/bottom executives by total sales
//! - `rollup`: per-region aggregation
//! - `support`: salespeople below the performance threshold

pub mod filter;
pub mod kpi;
pub mod ranking;
pub mod rollup;
pub mod support;

use serde::Serialize;

use crate::records::SalesRecord;

pub use filter::{region_options, RegionSelection, ALL_REGIONS};
pub use kpi::KpiSummary;
pub use ranking::{ExecutiveRanking, RankedExecutive, RANKING_SIZE};
pub use rollup::RegionRollup;
pub use support::{DEFAULT_SUPPORT_THRESHOLD, SUPPORT_THRESHOLD_STEP};

/// All four dashboard views over one filtered slice of the table.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub kpis: KpiSummary,
    pub ranking: ExecutiveRanking,
    pub regions: Vec<RegionRollup>,
    pub support: Vec<SalesRecord>,
}

/// Compute a full snapshot: apply the region selection once, then fan the
/// four views out across the rayon pool.
pub fn snapshot(
    records: &[SalesRecord],
    selection: &RegionSelection,
    threshold: f64,
) -> DashboardSnapshot {
    let filtered = selection.apply(records);

    let (kpis, (ranking, (regions, support))) = rayon::join(
        || kpi::compute(&filtered),
        || {
            rayon::join(
                || ranking::compute(&filtered),
                || {
                    rayon::join(
                        || rollup::compute(&filtered),
                        || support::compute(&filtered, threshold),
                    )
                },
            )
        },
    );

    DashboardSnapshot {
        kpis,
        ranking,
        regions,
        support,
    }
}
