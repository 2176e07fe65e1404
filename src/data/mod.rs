/// Data layer: core types, loading, filtering and derived views.
///
/// Architecture:
/// ```text
///   uploaded bytes + separator
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse once per (upload, separator) → Table
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ select / filter  │  projection or one row predicate → view
///   └─────────────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌─────────┐    ┌─────────┐    ┌─────────┐
///   │ summary  │    │  chart   │    │ export   │
///   └─────────┘    └─────────┘    └─────────┘
/// ```

pub mod chart;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
pub mod summary;
