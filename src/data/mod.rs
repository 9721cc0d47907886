/// Data layer: core types, loading, and result files.
///
/// Architecture:
/// ```text
///  .dat / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → SampleSet (bad rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  SampleSet    │  Vec<Sample>, consumed by the periodogram engine
///   └──────────────┘
///        │  … periodogram::compute …
///        ▼
///   ┌──────────┐
///   │  writer   │  PeriodogramResult → frequency\tpower rows
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
