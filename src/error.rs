//! Error taxonomy for the dashboard core
//!
//! Every failure is terminal for the current render pass: the caller must not
//! proceed with an empty or partial table.

use thiserror::Error;

/// Errors surfaced by the data-preparation pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Source file missing, unreadable, or holding values that cannot be
    /// coerced into the expected shape.
    #[error("sales data unavailable: {0}")]
    DataUnavailable(String),

    /// Expected columns absent after header normalization.
    #[error("sales data schema mismatch: missing column(s) {0:?}")]
    SchemaMismatch(Vec<String>),
}
