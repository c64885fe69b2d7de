//! Support list
//!
//! Salespeople whose target-hit ratio falls strictly below the chosen
//! threshold, worst first.

use crate::records::SalesRecord;

/// Default cutoff below which a salesperson is flagged.
pub const DEFAULT_SUPPORT_THRESHOLD: f64 = 0.6;

/// Granularity of the external threshold slider. The core accepts any float
/// in [0.0, 1.0]; snapping to this step is the control's job.
pub const SUPPORT_THRESHOLD_STEP: f64 = 0.05;

/// Rows with `target_hit_pct < threshold`, sorted ascending by
/// `target_hit_pct` (stable, so ties keep source order).
pub fn compute(records: &[SalesRecord], threshold: f64) -> Vec<SalesRecord> {
    let mut flagged: Vec<SalesRecord> = records
        .iter()
        .filter(|r| r.target_hit_pct < threshold)
        .cloned()
        .collect();
    flagged.sort_by(|a, b| a.target_hit_pct.total_cmp(&b.target_hit_pct));
    flagged
}
