// Prints a formatted snapshot of the sales dataset: normalized schema,
// KPIs, regional rollup, and the support list at the default threshold.
//
// Usage: cargo run --bin inspect_data [path/to/sales_data.csv]

use std::path::PathBuf;

use sales_dashboard_rust::format::{format_currency, format_pct};
use sales_dashboard_rust::views::{self, RegionSelection, DEFAULT_SUPPORT_THRESHOLD};
use sales_dashboard_rust::{data, records};

fn main() -> anyhow::Result<()> {
    let path: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SALES_DATA").ok())
        .unwrap_or_else(|| data::SOURCE_FILE.to_string())
        .into();

    let df = data::load_and_normalize(&path)?;
    let records = records::extract_records(&df)?;

    println!("Loaded '{}': {} rows", path.display(), df.height());
    println!("\nNormalized schema:");
    for column in df.get_columns() {
        println!("  {} ({})", column.name(), column.dtype());
    }

    let snapshot = views::snapshot(&records, &RegionSelection::All, DEFAULT_SUPPORT_THRESHOLD);

    println!("\nKPIs (all regions):");
    println!(
        "  Total sales:            {}",
        format_currency(snapshot.kpis.total_sales)
    );
    println!(
        "  Avg target hit:         {}",
        format_pct(snapshot.kpis.avg_target_hit_pct, 1)
    );
    println!("  Salesmen:               {}", snapshot.kpis.total_salesmen);
    println!("  Meeting target:         {}", snapshot.kpis.target_achieved);

    println!("\nRegional rollup:");
    for region in &snapshot.regions {
        println!(
            "  {:<16} avg hit {:>8}  sales {:>12}  {}",
            region.region,
            format_pct(region.avg_target_hit_pct, 1),
            format_currency(region.total_sales),
            if region.hit_target { "on target" } else { "below target" }
        );
    }

    println!(
        "\nNeeding support (target hit below {}):",
        format_pct(DEFAULT_SUPPORT_THRESHOLD, 0)
    );
    if snapshot.support.is_empty() {
        println!("  none");
    } else {
        for row in &snapshot.support {
            println!(
                "  {:<24} {:<12} hit {:>8}  sales {:>12}  target {:>12}",
                row.sales_executive,
                row.region,
                format_pct(row.target_hit_pct, 1),
                format_currency(row.total_sales),
                format_currency(row.target)
            );
        }
    }

    Ok(())
}
