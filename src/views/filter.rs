//! Region selection
//!
//! The multi-select control sends a list of region labels; the sentinel
//! label "All Regions" anywhere in that list keeps the whole table.

use crate::records::SalesRecord;

/// Sentinel label that selects every region.
pub const ALL_REGIONS: &str = "All Regions";

/// A user's region choice.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSelection {
    All,
    Regions(Vec<String>),
}

impl RegionSelection {
    /// Parse control labels. An empty list or any occurrence of
    /// [`ALL_REGIONS`] selects everything.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        if labels.is_empty() || labels.iter().any(|l| l.as_ref() == ALL_REGIONS) {
            return RegionSelection::All;
        }
        RegionSelection::Regions(labels.iter().map(|l| l.as_ref().to_string()).collect())
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionSelection::All => true,
            RegionSelection::Regions(chosen) => chosen.iter().any(|r| r == region),
        }
    }

    /// Keep the rows whose `region` is selected, preserving source order.
    pub fn apply(&self, records: &[SalesRecord]) -> Vec<SalesRecord> {
        records
            .iter()
            .filter(|r| self.matches(&r.region))
            .cloned()
            .collect()
    }
}

/// Labels for the region multi-select: the sentinel followed by the sorted
/// distinct region values.
pub fn region_options(records: &[SalesRecord]) -> Vec<String> {
    let mut regions: Vec<String> = records.iter().map(|r| r.region.clone()).collect();
    regions.sort();
    regions.dedup();

    let mut options = Vec::with_capacity(regions.len() + 1);
    options.push(ALL_REGIONS.to_string());
    options.extend(regions);
    options
}
