//! Date Completer
//!
//! Expands the daily table to a complete article x date grid within each
//! week. An article seen in a week gets a row for every date seen in that
//! week (across all articles). Grid cells with no sales get `purchases = 0`
//! and inherit the mean price and discount of their (week, article) group.

use crate::error::Result;
use crate::stage::{Stage, ensure_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

/// Configuration for the DateCompleter stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateCompleterConfig {}

/// DateCompleter fills the per-week article x date grid
#[derive(Debug, Default)]
pub struct DateCompleter {
    config: DateCompleterConfig,
}

impl DateCompleter {
    /// Complete the daily grid and impute missing values.
    ///
    /// Price and discount are only filled where missing. A (week, article)
    /// pair with no observed price keeps a null price; the same holds for
    /// discount. Output is sorted by `article`, `date`.
    pub fn complete(&self, daily: &DataFrame) -> Result<DataFrame> {
        let _span = info_span!("date_completer").entered();
        ensure_columns(daily, "daily", &self.required_columns())?;

        let daily_lf = daily.clone().lazy();
        let group = [col("week"), col("article")];

        let dates = daily_lf
            .clone()
            .select([col("date"), col("week")])
            .unique(None, UniqueKeepStrategy::Any);
        let articles = daily_lf
            .clone()
            .select([col("article"), col("week")])
            .unique(None, UniqueKeepStrategy::Any);

        // Per-week cross join: articles only meet the dates of their own week
        let grid = articles.join(
            dates,
            [col("week")],
            [col("week")],
            JoinArgs::new(JoinType::Inner),
        );

        let completed = grid
            .join(
                daily_lf,
                [col("date"), col("week"), col("article")],
                [col("date"), col("week"), col("article")],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns([
                col("purchases").fill_null(lit(0)),
                col("price").fill_null(col("price").mean().over(group.clone())),
                col("discount").fill_null(col("discount").mean().over(group)),
            ])
            .sort(["article", "date"], SortMultipleOptions::default())
            .collect()?;

        debug!(
            daily_rows = daily.height(),
            completed_rows = completed.height(),
            synthetic_rows = completed.height().saturating_sub(daily.height()),
            "Completed daily grid"
        );

        Ok(completed)
    }
}

impl Stage for DateCompleter {
    type Config = DateCompleterConfig;

    fn name(&self) -> &str {
        "date_completer"
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, BTreeSet};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn daily() -> DataFrame {
        // week0: days 1-3, week1: days 8-9
        df! {
            "article" => &[100i64, 100, 200, 200, 100],
            "date" => &[day(1), day(3), day(2), day(8), day(9)],
            "week" => &["week0", "week0", "week0", "week1", "week1"],
            "purchases" => &[4i64, 2, 1, 5, 3],
            "price" => &[Some(10.0), Some(12.0), None, Some(7.0), Some(9.0)],
            "discount" => &[Some(0.1), Some(0.3), Some(0.2), Some(0.4), None],
        }
        .unwrap()
    }

    fn rows(df: &DataFrame) -> Vec<(i64, i32, String, i64, Option<f64>, Option<f64>)> {
        let article = df.column("article").unwrap().i64().unwrap().clone();
        let date = df.column("date").unwrap().cast(&DataType::Int32).unwrap();
        let date = date.i32().unwrap().clone();
        let week = df.column("week").unwrap().str().unwrap().clone();
        let purchases = df.column("purchases").unwrap().i64().unwrap().clone();
        let price = df.column("price").unwrap().f64().unwrap().clone();
        let discount = df.column("discount").unwrap().f64().unwrap().clone();
        (0..df.height())
            .map(|i| {
                (
                    article.get(i).unwrap(),
                    date.get(i).unwrap(),
                    week.get(i).unwrap().to_string(),
                    purchases.get(i).unwrap(),
                    price.get(i),
                    discount.get(i),
                )
            })
            .collect()
    }

    #[test]
    fn test_stage_name() {
        let completer = DateCompleter::default();
        assert_eq!(completer.name(), "date_completer");
        assert_eq!(completer.required_columns().len(), 6);
    }

    #[test]
    fn test_grid_is_complete_per_week() {
        let completed = DateCompleter::default().complete(&daily()).unwrap();

        // week0: 2 articles x 3 dates, week1: 2 articles x 2 dates
        assert_eq!(completed.height(), 10);

        let mut week_dates: BTreeMap<String, BTreeSet<i32>> = BTreeMap::new();
        let mut pair_dates: BTreeMap<(i64, String), BTreeSet<i32>> = BTreeMap::new();
        for (article, date, week, ..) in rows(&completed) {
            week_dates.entry(week.clone()).or_default().insert(date);
            pair_dates.entry((article, week)).or_default().insert(date);
        }
        for ((_, week), dates) in &pair_dates {
            assert_eq!(dates, &week_dates[week]);
        }
    }

    #[test]
    fn test_synthetic_rows_are_imputed() {
        let completed = DateCompleter::default().complete(&daily()).unwrap();
        let rows = rows(&completed);

        // article 100, day 2 (week0) is synthetic: price mean(10, 12), discount mean(0.1, 0.3)
        let (_, _, _, purchases, price, discount) = rows
            .iter()
            .find(|r| r.0 == 100 && r.1 == day_index(2))
            .cloned()
            .unwrap();
        assert_eq!(purchases, 0);
        assert_relative_eq!(price.unwrap(), 11.0);
        assert_relative_eq!(discount.unwrap(), 0.2, epsilon = 1e-12);

        // article 200 in week0 has no observed price at all: stays undefined
        let week0_200: Vec<_> = rows
            .iter()
            .filter(|r| r.0 == 200 && r.2 == "week0")
            .collect();
        assert_eq!(week0_200.len(), 3);
        assert!(week0_200.iter().all(|r| r.4.is_none()));

        // article 100 in week1: observed discount missing everywhere -> undefined
        let week1_100: Vec<_> = rows
            .iter()
            .filter(|r| r.0 == 100 && r.2 == "week1")
            .collect();
        assert!(week1_100.iter().all(|r| r.5.is_none()));
    }

    #[test]
    fn test_observed_values_are_not_overwritten() {
        let input = daily();
        let completed = DateCompleter::default().complete(&input).unwrap();
        let completed_rows = rows(&completed);

        for observed in rows(&input) {
            let out = completed_rows
                .iter()
                .find(|r| r.0 == observed.0 && r.1 == observed.1)
                .unwrap();
            assert_eq!(out.3, observed.3);
            if observed.4.is_some() {
                assert_eq!(out.4, observed.4);
            }
            if observed.5.is_some() {
                assert_eq!(out.5, observed.5);
            }
        }
    }

    #[test]
    fn test_output_sorted_by_article_then_date() {
        let completed = DateCompleter::default().complete(&daily()).unwrap();
        let keys: Vec<(i64, i32)> = rows(&completed).iter().map(|r| (r.0, r.1)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let input = daily().drop("discount").unwrap();
        assert!(DateCompleter::default().complete(&input).is_err());
    }

    fn day_index(d: u32) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (day(d) - epoch).num_days() as i32
    }
}
