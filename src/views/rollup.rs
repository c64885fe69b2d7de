//! Regional rollup
//!
//! Groups the filtered rows by `region` and aggregates mean target-hit and
//! total sales per group, sorted for the regional bar chart.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::records::SalesRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRollup {
    pub region: String,
    /// Mean `target_hit_pct` across the region's rows, as a ratio.
    pub avg_target_hit_pct: f64,
    pub total_sales: f64,
    /// Whether the region's mean reaches its target (ratio >= 1.0).
    pub hit_target: bool,
}

/// Aggregate per region, sorted by mean target-hit descending with ties
/// broken by region name.
pub fn compute(records: &[SalesRecord]) -> Vec<RegionRollup> {
    let mut groups: FxHashMap<&str, (f64, f64, usize)> = FxHashMap::default();
    for record in records {
        let entry = groups.entry(record.region.as_str()).or_insert((0.0, 0.0, 0));
        entry.0 += record.target_hit_pct;
        entry.1 += record.total_sales;
        entry.2 += 1;
    }

    let mut rollups: Vec<RegionRollup> = groups
        .into_iter()
        .map(|(region, (hit_sum, sales_sum, count))| {
            let avg = hit_sum / count as f64;
            RegionRollup {
                region: region.to_string(),
                avg_target_hit_pct: avg,
                total_sales: sales_sum,
                hit_target: avg >= 1.0,
            }
        })
        .collect();

    rollups.sort_by(|a, b| {
        b.avg_target_hit_pct
            .total_cmp(&a.avg_target_hit_pct)
            .then_with(|| a.region.cmp(&b.region))
    });

    rollups
}
