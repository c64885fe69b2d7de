//! Executive ranking
//!
//! Sorts the filtered rows by `total_sales` descending and takes the two
//! extremes for the side-by-side chart. With fewer than twice
//! [`RANKING_SIZE`] rows the two ends may overlap; that is accepted as-is.

use serde::Serialize;
use smallvec::SmallVec;

use crate::records::SalesRecord;

/// Rows kept at each end of the ordering.
pub const RANKING_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedExecutive {
    pub emp_code: String,
    pub sales_executive: String,
    pub region: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveRanking {
    /// Highest sellers, descending.
    pub top: SmallVec<[RankedExecutive; RANKING_SIZE]>,
    /// Lowest sellers, still in descending order (the tail of the ranking).
    pub bottom: SmallVec<[RankedExecutive; RANKING_SIZE]>,
}

pub fn compute(records: &[SalesRecord]) -> ExecutiveRanking {
    let mut ordered: Vec<&SalesRecord> = records.iter().collect();
    // Stable sort keeps source order for equal sales.
    ordered.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));

    let take = RANKING_SIZE.min(ordered.len());
    let top = ordered[..take].iter().map(|r| ranked(r)).collect();
    let bottom = ordered[ordered.len() - take..]
        .iter()
        .map(|r| ranked(r))
        .collect();

    ExecutiveRanking { top, bottom }
}

fn ranked(record: &SalesRecord) -> RankedExecutive {
    RankedExecutive {
        emp_code: record.emp_code.clone(),
        sales_executive: record.sales_executive.clone(),
        region: record.region.clone(),
        total_sales: record.total_sales,
    }
}
