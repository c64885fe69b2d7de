//! Dataset preparation
//!
//! Loads the raw sales CSV and normalizes its schema: spaced headers are
//! renamed to their underscore-joined counterparts and percentage text
//! columns are coerced to numeric ratios. Normalization is column-level
//! only; row order and row count always match the source.

use std::path::Path;

use polars::prelude::*;

use crate::error::DashboardError;

/// Conventional source file name.
pub const SOURCE_FILE: &str = "sales_data.csv";

/// Spaced source headers and their normalized names. Headers not listed here
/// (`Region`, `Target`) pass through unchanged.
pub const COLUMN_RENAMES: [(&str, &str); 5] = [
    ("Emp Code", "emp_code"),
    ("Sales Executive", "sales_executive"),
    ("Total Sales", "total_sales"),
    ("Target Hit %", "target_hit_pct"),
    ("Away From Target %", "away_from_target_pct"),
];

/// Columns holding ratios that the source may encode as `"67.80%"` text.
pub const PCT_COLUMNS: [&str; 2] = ["target_hit_pct", "away_from_target_pct"];

/// Full semantic column set required after normalization.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "emp_code",
    "sales_executive",
    "Region",
    "total_sales",
    "Target",
    "target_hit_pct",
    "away_from_target_pct",
];

/// Load the sales table from `path` and normalize its schema.
///
/// A missing or unparseable source fails with
/// [`DashboardError::DataUnavailable`]; callers must treat that as fatal for
/// the current render and must not proceed with a partial table.
pub fn load_and_normalize(path: &Path) -> Result<DataFrame, DashboardError> {
    let mut df = read_csv(path)?;
    rename_columns(&mut df)?;
    for name in PCT_COLUMNS {
        normalize_pct_column(&mut df, name)?;
    }
    Ok(df)
}

/// Verify that every semantic column survived normalization.
pub fn validate_schema(df: &DataFrame) -> Result<(), DashboardError> {
    let present: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&name| !present.iter().any(|c| c == name))
        .map(|&name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::SchemaMismatch(missing))
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, DashboardError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "'{}' could not be opened: {}",
                path.display(),
                e
            ))
        })?
        .finish()
        .map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "'{}' could not be parsed: {}",
                path.display(),
                e
            ))
        })
}

/// Apply [`COLUMN_RENAMES`] to whichever spaced headers are present.
/// Idempotent: headers already normalized are left alone.
fn rename_columns(df: &mut DataFrame) -> Result<(), DashboardError> {
    for (from, to) in COLUMN_RENAMES {
        let present = df.get_column_names().iter().any(|c| c.as_str() == from);
        if present {
            df.rename(from, to.into()).map_err(|e| {
                DashboardError::DataUnavailable(format!(
                    "failed to rename column '{}': {}",
                    from, e
                ))
            })?;
        }
    }
    Ok(())
}

/// Coerce a percentage column from `"NN.NN%"` text to a float ratio.
///
/// Type-guarded: only textual columns are touched, so a column already
/// holding numeric ratios is never divided a second time.
fn normalize_pct_column(df: &mut DataFrame, name: &str) -> Result<(), DashboardError> {
    let Ok(column) = df.column(name) else {
        // Absent columns are reported by validate_schema, not here.
        return Ok(());
    };
    if column.dtype() != &DataType::String {
        return Ok(());
    }

    let text = column.str().map_err(|e| {
        DashboardError::DataUnavailable(format!("column '{}' is not readable as text: {}", name, e))
    })?;

    let ratios: Vec<Option<f64>> = text
        .into_iter()
        .map(|value| {
            value
                .map(|raw| {
                    let stripped = raw.trim().trim_end_matches('%').trim();
                    stripped.parse::<f64>().map(|v| v / 100.0).map_err(|_| {
                        DashboardError::DataUnavailable(format!(
                            "column '{}' holds non-numeric percentage text '{}'",
                            name, raw
                        ))
                    })
                })
                .transpose()
        })
        .collect::<Result<_, _>>()?;

    df.with_column(Series::new(name.into(), ratios)).map_err(|e| {
        DashboardError::DataUnavailable(format!("failed to replace column '{}': {}", name, e))
    })?;

    Ok(())
}
