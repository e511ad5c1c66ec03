/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / bundled
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PenguinDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PenguinDataset  │  Vec<Penguin>, column order
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  species selection → FilteredView (row indices)
///   └──────────┘
///        │
///        ├──▶ table   → TableView
///        └──▶ export  → CSV text / file
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod table;
