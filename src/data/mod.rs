/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  embedded table      .parquet / .json / .csv
///        │                      │
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │  sample   │          │  loader   │  parse file → RouteDataset
///   └──────────┘          └──────────┘
///        │                      │
///        └──────────┬───────────┘
///                   ▼
///           ┌──────────────┐
///           │ RouteDataset  │  Vec<Route>, country index
///           └──────────────┘
///                   │
///                   ▼
///           ┌──────────┐
///           │  filter   │  apply thresholds → FilteredResult + metrics
///           └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
