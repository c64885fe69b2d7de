//! Typed sales records
//!
//! Materializes the normalized table into plain rows for the view layer.
//! Extraction fails closed: a missing column or an empty cell in any
//! semantic field rejects the whole dataset.

use polars::prelude::*;
use serde::Serialize;

use crate::data;
use crate::error::DashboardError;

/// One salesperson-row of the prepared table.
///
/// `target_hit_pct` and `away_from_target_pct` are ratios (0.5 = 50%);
/// multiplying by 100 is display-only and belongs to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub emp_code: String,
    pub sales_executive: String,
    pub region: String,
    pub total_sales: f64,
    pub target: f64,
    pub target_hit_pct: f64,
    pub away_from_target_pct: f64,
}

/// Convert a normalized table into typed rows, preserving row order.
pub fn extract_records(df: &DataFrame) -> Result<Vec<SalesRecord>, DashboardError> {
    data::validate_schema(df)?;

    let emp_code = string_column(df, "emp_code")?;
    let sales_executive = string_column(df, "sales_executive")?;
    let region = string_column(df, "Region")?;
    let total_sales = float_column(df, "total_sales")?;
    let target = float_column(df, "Target")?;
    let target_hit_pct = float_column(df, "target_hit_pct")?;
    let away_from_target_pct = float_column(df, "away_from_target_pct")?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(SalesRecord {
            emp_code: required_str(&emp_code, idx, "emp_code")?.to_string(),
            sales_executive: required_str(&sales_executive, idx, "sales_executive")?.to_string(),
            region: required_str(&region, idx, "Region")?.to_string(),
            total_sales: required_f64(&total_sales, idx, "total_sales")?,
            target: required_f64(&target, idx, "Target")?,
            target_hit_pct: required_f64(&target_hit_pct, idx, "target_hit_pct")?,
            away_from_target_pct: required_f64(&away_from_target_pct, idx, "away_from_target_pct")?,
        });
    }

    Ok(records)
}

/// Get a float column, accepting integer storage via cast.
fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked, DashboardError> {
    let column = df.column(name).map_err(|_| {
        DashboardError::SchemaMismatch(vec![name.to_string()])
    })?;

    if let Ok(f) = column.f64() {
        return Ok(f.clone());
    }
    if let Ok(i) = column.i64() {
        let cast = i.cast(&DataType::Float64).map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "column '{}' could not be cast to float: {}",
                name, e
            ))
        })?;
        return Ok(cast
            .f64()
            .map_err(|e| {
                DashboardError::DataUnavailable(format!(
                    "column '{}' could not be read as float: {}",
                    name, e
                ))
            })?
            .clone());
    }

    Err(DashboardError::DataUnavailable(format!(
        "column '{}' is not numeric (found {})",
        name,
        column.dtype()
    )))
}

/// Get a string column, accepting other storage kinds via cast.
fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked, DashboardError> {
    let column = df.column(name).map_err(|_| {
        DashboardError::SchemaMismatch(vec![name.to_string()])
    })?;

    if let Ok(s) = column.str() {
        return Ok(s.clone());
    }

    let cast = column.cast(&DataType::String).map_err(|e| {
        DashboardError::DataUnavailable(format!(
            "column '{}' could not be cast to text: {}",
            name, e
        ))
    })?;
    Ok(cast
        .str()
        .map_err(|e| {
            DashboardError::DataUnavailable(format!(
                "column '{}' could not be read as text: {}",
                name, e
            ))
        })?
        .clone())
}

fn required_str<'a>(
    column: &'a StringChunked,
    idx: usize,
    name: &str,
) -> Result<&'a str, DashboardError> {
    column.get(idx).ok_or_else(|| {
        DashboardError::DataUnavailable(format!("row {} has no value in column '{}'", idx, name))
    })
}

fn required_f64(
    column: &Float64Chunked,
    idx: usize,
    name: &str,
) -> Result<f64, DashboardError> {
    column.get(idx).ok_or_else(|| {
        DashboardError::DataUnavailable(format!("row {} has no value in column '{}'", idx, name))
    })
}
