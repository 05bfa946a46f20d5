/// Data layer: records, loading, selection and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → EmissionsDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ EmissionsDataset │  Vec<EmissionsRecord>, option lists
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  validated Selection → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  sums, means, rankings, histogram, series
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  DashboardViews handed to the UI
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;

#[cfg(test)]
pub(crate) mod strategies;
