//! KPI aggregates
//!
//! The four headline numbers over the filtered rows. `avg_target_hit_pct`
//! stays a ratio; the renderer multiplies by 100 for display.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::records::SalesRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Sum of `total_sales`.
    pub total_sales: f64,
    /// Mean of `target_hit_pct` as a ratio; 0.0 for an empty slice.
    pub avg_target_hit_pct: f64,
    /// Count of distinct `emp_code` values.
    pub total_salesmen: usize,
    /// Count of rows with `target_hit_pct >= 1.0`.
    pub target_achieved: usize,
}

pub fn compute(records: &[SalesRecord]) -> KpiSummary {
    let total_sales: f64 = records.iter().map(|r| r.total_sales).sum();

    let avg_target_hit_pct = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.target_hit_pct).sum::<f64>() / records.len() as f64
    };

    let distinct: FxHashSet<&str> = records.iter().map(|r| r.emp_code.as_str()).collect();
    let target_achieved = records.iter().filter(|r| r.target_hit_pct >= 1.0).count();

    KpiSummary {
        total_sales,
        avg_target_hit_pct,
        total_salesmen: distinct.len(),
        target_achieved,
    }
}
