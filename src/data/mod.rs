/// Data layer: discovery, loading, filtering and export.
///
/// Architecture:
/// ```text
///  root dir + pattern
///        │
///        ▼
///   ┌──────────┐
///   │ discover │  walk tree → Vec<PathBuf>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  gunzip, parse, annotate treatment/trial → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  per-column value selections → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  Table → CSV, CI summary → JSON
///   └──────────┘
/// ```

pub mod discover;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
