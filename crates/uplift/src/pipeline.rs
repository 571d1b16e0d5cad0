//! End-to-end pipeline.
//!
//! Runs Merger, DailyAggregator, DateCompleter and FeatureBuilder in order.
//! The product table feeds both the merge and the catalog attribute join.

use crate::config::PipelineConfig;
use polars::prelude::*;
use tracing::{info, info_span};
use uplift_features::FeatureBuilder;
use uplift_prep::{DailyAggregator, DateCompleter, Merger, Result, Stage};

/// Every table produced by the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Sales joined to the catalog, with `variant_parent` and `week`
    pub merged: DataFrame,
    /// One row per grouping key with purchases, price and discount
    pub daily: DataFrame,
    /// Daily table with the per-week article x date grid filled in
    pub completed: DataFrame,
    /// Model-ready feature table
    pub features: DataFrame,
}

/// Build the training table from raw sales and catalog tables.
pub fn run_pipeline(
    sales: &DataFrame,
    products: &DataFrame,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let _span = info_span!("pipeline").entered();

    let merged = Merger::with_config(config.merger.clone()).merge(sales, products)?;
    let daily = DailyAggregator::with_config(config.daily.clone()).aggregate(&merged)?;
    let completed = DateCompleter::with_config(config.completer.clone()).complete(&daily)?;
    let features = FeatureBuilder::with_config(config.features.clone()).build(&completed, products)?;

    info!(
        sales_rows = sales.height(),
        feature_rows = features.height(),
        "Training table built"
    );

    Ok(PipelineOutput {
        merged,
        daily,
        completed,
        features,
    })
}

/// Build only the feature table.
pub fn build_training_table(
    sales: &DataFrame,
    products: &DataFrame,
    config: &PipelineConfig,
) -> Result<DataFrame> {
    run_pipeline(sales, products, config).map(|out| out.features)
}
