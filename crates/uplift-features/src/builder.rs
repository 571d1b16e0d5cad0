//! Feature Builder
//!
//! Derives the model features from the completed daily table, in order:
//!
//! 1. `markdown`: 0 in the baseline week, 1 otherwise
//! 2. `sold_days`: days with purchases per (week, article)
//! 3. `base_line_price` / `base_line_purchases`: per-article means over
//!    baseline rows, attached to every week
//! 4. missing `price` filled with `base_line_price`
//! 5. `price_ratio = price / base_line_price`
//! 6. `discount_rank`: global discount quantile, 1 = lowest
//! 7. `is_first_md_day`: first markdown row after a non-markdown row
//! 8. `purchases_lag1`: previous day's purchases per article
//!
//! Requested catalog attributes are left-joined on `article`.

use crate::quantile::{bin_expr, strict_edges};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};
use uplift_prep::{Result, Stage, ensure_columns};

/// Configuration for the FeatureBuilder stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureBuilderConfig {
    /// Catalog attributes attached to every row (default: none)
    pub product_features: Vec<String>,
    /// Week label of the pre-markdown period (default: "week0")
    pub baseline_week: String,
    /// Number of discount quantile bins (default: 4)
    pub quantiles: usize,
}

impl Default for FeatureBuilderConfig {
    fn default() -> Self {
        Self {
            product_features: Vec::new(),
            baseline_week: "week0".to_string(),
            quantiles: 4,
        }
    }
}

/// FeatureBuilder derives model features from the completed daily table
#[derive(Debug)]
pub struct FeatureBuilder {
    config: FeatureBuilderConfig,
}

impl FeatureBuilder {
    /// Build the feature table.
    ///
    /// Catalog attributes are validated before anything is computed. The
    /// output is sorted by `article`, `date`.
    pub fn build(&self, completed: &DataFrame, products: &DataFrame) -> Result<DataFrame> {
        let _span = info_span!("feature_builder").entered();

        let mut catalog_columns: Vec<&str> = vec!["article"];
        catalog_columns.extend(self.config.product_features.iter().map(String::as_str));
        ensure_columns(products, "products", &catalog_columns)?;
        ensure_columns(completed, "completed", &self.required_columns())?;

        let article = [col("article")];
        let baseline_rows = col("markdown").eq(lit(0i64));

        let staged = completed
            .clone()
            .lazy()
            .sort(
                ["article", "date"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .with_column(
                when(col("week").eq(lit(self.config.baseline_week.as_str())))
                    .then(lit(0i64))
                    .otherwise(lit(1i64))
                    .alias("markdown"),
            )
            .with_columns([
                col("purchases")
                    .gt(lit(0))
                    .cast(DataType::Int64)
                    .sum()
                    .over([col("week"), col("article")])
                    .alias("sold_days"),
                col("price")
                    .cast(DataType::Float64)
                    .filter(baseline_rows.clone())
                    .mean()
                    .over(article.clone())
                    .alias("base_line_price"),
                col("purchases")
                    .cast(DataType::Float64)
                    .filter(baseline_rows)
                    .mean()
                    .over(article.clone())
                    .alias("base_line_purchases"),
            ])
            .with_column(col("price").fill_null(col("base_line_price")))
            .with_column(
                when(col("base_line_price").eq(lit(0.0)))
                    .then(lit(NULL).cast(DataType::Float64))
                    .otherwise(col("price") / col("base_line_price"))
                    .alias("price_ratio"),
            )
            .collect()?;

        let edges = strict_edges(staged.clone().lazy(), "discount", self.config.quantiles)?;
        let discount_rank = match edges {
            Some(edges) => {
                debug!(?edges, "Discount quantile edges");
                bin_expr(col("discount"), &edges)
            }
            None => lit(NULL).cast(DataType::Int64),
        };

        let catalog = products
            .clone()
            .lazy()
            .select(catalog_columns.iter().map(|c| col(*c)).collect::<Vec<_>>());

        let features = staged
            .lazy()
            .with_columns([
                discount_rank.alias("discount_rank"),
                first_markdown_flag(col("markdown"), &article).alias("is_first_md_day"),
                lagged(col("purchases"), &article, lit(0)).alias("purchases_lag1"),
            ])
            .join(
                catalog,
                [col("article")],
                [col("article")],
                JoinArgs::new(JoinType::Left),
            )
            .sort(
                ["article", "date"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;

        debug!(
            completed_rows = completed.height(),
            feature_rows = features.height(),
            "Built features"
        );

        Ok(features)
    }
}

/// Previous row's value of `expr` within each `partition`, `fill` on the first row.
///
/// Rows must already be in date order.
pub fn lagged(expr: Expr, partition: &[Expr], fill: Expr) -> Expr {
    expr.shift(lit(1)).over(partition).fill_null(fill)
}

/// 1 on a markdown row whose predecessor in the partition was not a markdown
/// row (a missing predecessor counts as 0), else 0.
///
/// Rows must already be in date order.
pub fn first_markdown_flag(markdown: Expr, partition: &[Expr]) -> Expr {
    markdown
        .clone()
        .eq(lit(1i64))
        .and(lagged(markdown, partition, lit(0i64)).eq(lit(0i64)))
        .cast(DataType::Int64)
}

impl Stage for FeatureBuilder {
    type Config = FeatureBuilderConfig;

    fn name(&self) -> &str {
        "feature_builder"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec!["article", "date", "week", "purchases", "price", "discount"]
    }

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::with_config(FeatureBuilderConfig::default())
    }
}
