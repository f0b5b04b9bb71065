/// Data layer: core types, loading, and cleaning.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  named columns of CellValue
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop rows with missing cells → CleaningReport
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
