//! Stage Registry
//!
//! Static description of the four pipeline stages in execution order.

/// Stage metadata
#[derive(Debug, Clone)]
pub struct StageInfo {
    /// Stage name (unique identifier)
    pub name: &'static str,
    /// Position in the pipeline, starting at 1
    pub order: usize,
    /// What the stage produces
    pub description: &'static str,
    /// Columns required on the stage's primary input with default configuration
    pub required_columns: &'static [&'static str],
}

/// All stages in execution order
pub fn available_stages() -> Vec<StageInfo> {
    vec![
        StageInfo {
            name: "merger",
            order: 1,
            description: "Join sales to the catalog via the parent article and assign week buckets",
            required_columns: &["date", "variant", "net_amount", "gross_amount", "purchases"],
        },
        StageInfo {
            name: "daily_aggregator",
            order: 2,
            description: "Derive unit price and discount, aggregate to one row per article and day",
            required_columns: &[
                "article",
                "date",
                "week",
                "purchases",
                "net_amount",
                "gross_amount",
            ],
        },
        StageInfo {
            name: "date_completer",
            order: 3,
            description: "Complete the article x date grid within each week and impute gaps",
            required_columns: &["article", "date", "week", "purchases", "price", "discount"],
        },
        StageInfo {
            name: "feature_builder",
            order: 4,
            description: "Derive markdown, baseline, price ratio, discount rank and lag features",
            required_columns: &["article", "date", "week", "purchases", "price", "discount"],
        },
    ]
}

/// Get stage info by name
pub fn get_stage_info(name: &str) -> Option<StageInfo> {
    available_stages().into_iter().find(|s| s.name == name)
}

/// List all stage names in execution order
pub fn list_stage_names() -> Vec<&'static str> {
    available_stages().into_iter().map(|s| s.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplift_features::FeatureBuilder;
    use uplift_prep::{DailyAggregator, DateCompleter, Merger, Stage};

    #[test]
    fn test_stage_order() {
        assert_eq!(
            list_stage_names(),
            vec!["merger", "daily_aggregator", "date_completer", "feature_builder"]
        );
        for (i, stage) in available_stages().iter().enumerate() {
            assert_eq!(stage.order, i + 1);
        }
    }

    #[test]
    fn test_get_stage_info() {
        let info = get_stage_info("date_completer").unwrap();
        assert!(info.required_columns.contains(&"week"));
        assert!(get_stage_info("nonexistent_stage").is_none());
    }

    #[test]
    fn test_registry_matches_stages() {
        let merger = Merger::default();
        let daily = DailyAggregator::default();
        let completer = DateCompleter::default();
        let builder = FeatureBuilder::default();

        let stages = [
            (merger.name(), merger.required_columns()),
            (daily.name(), daily.required_columns()),
            (completer.name(), completer.required_columns()),
            (builder.name(), builder.required_columns()),
        ];
        for (name, columns) in stages {
            let info = get_stage_info(name).unwrap();
            assert_eq!(info.required_columns.to_vec(), columns, "stage {name}");
        }
    }
}
