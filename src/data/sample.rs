use super::model::{Route, RouteDataset};

/// Built-in route table shown until the user opens a file.
///
/// Volumes are in billions of USD.
pub fn sample_routes() -> Vec<Route> {
    vec![
        Route::new("USA", "China", 100.0, 0.25),
        Route::new("Germany", "USA", 80.0, 0.15),
        Route::new("Japan", "USA", 70.0, 0.20),
        Route::new("China", "Germany", 90.0, 0.10),
        Route::new("Brazil", "China", 60.0, 0.30),
        Route::new("India", "USA", 50.0, 0.18),
        Route::new("UK", "USA", 65.0, 0.12),
        Route::new("Australia", "China", 45.0, 0.22),
    ]
}

pub fn sample_dataset() -> RouteDataset {
    RouteDataset::from_routes(sample_routes())
}
