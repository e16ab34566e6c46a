/// Data layer: core types, loading, classification and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  rename → project → coerce → admit
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  latest GDP/capita per country → IncomeTier
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MacroDataset  │  held by cache, computed once
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year + country set → SelectionView
///   └──────────┘
/// ```

pub mod cache;
pub mod classify;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
