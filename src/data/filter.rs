use super::model::{FilterThresholds, FilteredResult, Route, RouteDataset, SummaryMetrics};

// ---------------------------------------------------------------------------
// Threshold predicate
// ---------------------------------------------------------------------------

/// Whether a route survives the thresholds.
///
/// Both bounds are inclusive on the kept side. A NaN field fails its
/// comparison, so such a route is dropped rather than repaired.
pub fn passes(route: &Route, thresholds: &FilterThresholds) -> bool {
    route.volume >= thresholds.min_volume && route.tariff_impact <= thresholds.max_tariff_impact
}

/// Apply `thresholds` to `dataset` and summarise what is left.
///
/// Single pass: metrics are accumulated while routes are collected. The
/// kept routes keep their original relative order.
pub fn filter(dataset: &RouteDataset, thresholds: &FilterThresholds) -> FilteredResult {
    let mut routes = Vec::new();
    let mut volume_sum = 0.0;
    let mut tariff_sum = 0.0;

    for route in dataset.routes.iter().filter(|r| passes(r, thresholds)) {
        volume_sum += route.volume;
        tariff_sum += route.tariff_impact;
        routes.push(route.clone());
    }

    let route_count = routes.len();
    let mean = |sum: f64| (route_count > 0).then(|| sum / route_count as f64);

    FilteredResult {
        metrics: SummaryMetrics {
            route_count,
            average_volume: mean(volume_sum),
            average_tariff_impact: mean(tariff_sum),
        },
        routes,
    }
}

/// Return indices of routes that pass the thresholds.
pub fn filtered_indices(dataset: &RouteDataset, thresholds: &FilterThresholds) -> Vec<usize> {
    dataset
        .routes
        .iter()
        .enumerate()
        .filter(|(_, r)| passes(r, thresholds))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_dataset;

    fn three_routes() -> RouteDataset {
        RouteDataset::from_routes(vec![
            Route::new("USA", "China", 100.0, 0.25),
            Route::new("Germany", "USA", 80.0, 0.15),
            Route::new("Japan", "USA", 70.0, 0.20),
        ])
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_identity_thresholds_keep_everything() {
        let ds = sample_dataset();
        let result = filter(&ds, &FilterThresholds::default());
        assert_eq!(result.routes, ds.routes);
        assert_eq!(result.metrics.route_count, ds.len());
    }

    #[test]
    fn test_empty_dataset_has_undefined_averages() {
        let thresholds = [
            FilterThresholds::default(),
            FilterThresholds::from_slider(50, 10),
        ];
        for t in thresholds {
            let result = filter(&RouteDataset::default(), &t);
            assert!(result.routes.is_empty());
            assert_eq!(result.metrics.route_count, 0);
            assert_eq!(result.metrics.average_volume, None);
            assert_eq!(result.metrics.average_tariff_impact, None);
        }
    }

    #[test]
    fn test_volume_and_tariff_thresholds_combine() {
        let t = FilterThresholds {
            min_volume: 75.0,
            max_tariff_impact: 0.20,
        };
        let result = filter(&three_routes(), &t);

        // USA→China fails on tariff, Japan→USA on volume.
        assert_eq!(result.routes, vec![Route::new("Germany", "USA", 80.0, 0.15)]);
        assert_eq!(result.metrics.route_count, 1);
        assert!(approx(result.metrics.average_volume, 80.0));
        assert!(approx(result.metrics.average_tariff_impact, 0.15));
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = FilterThresholds {
            min_volume: 70.0,
            max_tariff_impact: 0.20,
        };
        let result = filter(&three_routes(), &t);
        let names: Vec<String> = result.routes.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["Germany → USA", "Japan → USA"]);
        assert!(approx(result.metrics.average_volume, 75.0));
        assert!(approx(result.metrics.average_tariff_impact, 0.175));
    }

    #[test]
    fn test_volume_above_all_routes_yields_empty() {
        let t = FilterThresholds {
            min_volume: 200.0,
            max_tariff_impact: 1.0,
        };
        let result = filter(&sample_dataset(), &t);
        assert!(result.routes.is_empty());
        assert_eq!(result.metrics, SummaryMetrics::default());
    }

    #[test]
    fn test_result_is_ordered_subsequence_and_partition_holds() {
        let ds = sample_dataset();
        for min_volume in [0, 45, 60, 65, 90, 100] {
            for pct in [0, 10, 15, 20, 25, 100] {
                let t = FilterThresholds::from_slider(min_volume, pct);
                let result = filter(&ds, &t);

                // Subsequence: every kept route appears in the dataset after
                // the previous kept route.
                let mut cursor = 0;
                for kept in &result.routes {
                    let pos = ds.routes[cursor..]
                        .iter()
                        .position(|r| r == kept)
                        .expect("kept route must appear in order");
                    cursor += pos + 1;
                }

                let kept_idx = filtered_indices(&ds, &t);
                assert_eq!(kept_idx.len(), result.metrics.route_count);
                for (i, r) in ds.routes.iter().enumerate() {
                    let ok = r.volume >= t.min_volume && r.tariff_impact <= t.max_tariff_impact;
                    assert_eq!(kept_idx.contains(&i), ok, "route {r} at {t:?}");
                }
            }
        }
    }

    #[test]
    fn test_duplicates_are_filtered_independently() {
        let ds = RouteDataset::from_routes(vec![
            Route::new("USA", "China", 100.0, 0.25),
            Route::new("USA", "China", 40.0, 0.25),
        ]);
        let result = filter(&ds, &FilterThresholds::from_slider(50, 100));
        assert_eq!(result.routes, vec![Route::new("USA", "China", 100.0, 0.25)]);
    }

    #[test]
    fn test_nan_fields_are_dropped_not_repaired() {
        let ds = RouteDataset::from_routes(vec![
            Route::new("A", "B", f64::NAN, 0.1),
            Route::new("C", "D", 10.0, f64::NAN),
            Route::new("E", "F", 10.0, 0.1),
        ]);
        let result = filter(&ds, &FilterThresholds::default());
        assert_eq!(result.metrics.route_count, 1);
        assert_eq!(result.routes[0].origin, "E");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = sample_dataset();
        let t = FilterThresholds::from_slider(60, 22);
        assert_eq!(filter(&ds, &t), filter(&ds, &t));
    }
}
