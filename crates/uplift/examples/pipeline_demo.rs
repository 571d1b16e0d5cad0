//! Demonstration of the Uplift training-table pipeline
//!
//! This example shows how to:
//! - Build small sales and product tables in memory
//! - Run all four stages with a custom configuration
//! - Inspect the intermediate and final tables
//!
//! Run with: cargo run --example pipeline_demo -p uplift

use chrono::NaiveDate;
use polars::prelude::*;
use uplift::{PipelineConfig, available_stages, run_pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Uplift Pipeline Demo");
    println!("====================\n");

    println!("Stages:");
    for stage in available_stages() {
        println!("  {}. {:18} {}", stage.order, stage.name, stage.description);
    }
    println!();

    let sales = sample_sales()?;
    let products = df! {
        "article" => &[100i64, 200],
        "category" => &["shoes", "hats"],
    }?;

    let mut config = PipelineConfig::default();
    config.features.product_features = vec!["category".to_string()];

    let out = run_pipeline(&sales, &products, &config)?;

    println!("Rows per stage:");
    println!("  merged     {:4}", out.merged.height());
    println!("  daily      {:4}", out.daily.height());
    println!("  completed  {:4}", out.completed.height());
    println!("  features   {:4}", out.features.height());
    println!();

    let preview = out.features.select([
        "article",
        "date",
        "week",
        "purchases",
        "price_ratio",
        "discount_rank",
        "is_first_md_day",
        "purchases_lag1",
        "category",
    ])?;
    println!("Feature table:\n{preview}");

    Ok(())
}

/// Two weeks of sales for two articles: small promotions in the first
/// week, deepening markdowns in the second.
fn sample_sales() -> PolarsResult<DataFrame> {
    let mut date = Vec::new();
    let mut variant = Vec::new();
    let mut net = Vec::new();
    let mut gross = Vec::new();
    let mut purchases = Vec::new();

    for d in 1..=14u32 {
        let day = NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default();
        let markdown = if d > 7 {
            0.05 * (d - 7) as f64
        } else {
            0.01 * (d % 4) as f64
        };

        let units = 2 + (d % 3) as i64;
        date.push(day);
        variant.push(100001i64);
        gross.push(25.0 * units as f64);
        net.push(25.0 * units as f64 * (1.0 - markdown));
        purchases.push(units);

        if d % 2 == 0 {
            date.push(day);
            variant.push(200002i64);
            gross.push(12.0);
            net.push(12.0 * (1.0 - markdown / 2.0));
            purchases.push(1i64);
        }
    }

    df! {
        "date" => date,
        "variant" => variant,
        "net_amount" => net,
        "gross_amount" => gross,
        "purchases" => purchases,
    }
}
