/// Data layer: core types, loading, caching, and filtering.
///
/// Architecture:
/// ```text
///   <data_dir>/<niche>.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (lowercased columns, `id` ensured)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  DatasetRegistry: bounded LRU of Arc<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  pure predicates → row indices
///   └──────────┘
/// ```
pub mod cache;
pub mod loader;
pub mod model;
pub mod query;

use thiserror::Error;

/// Failures resolving a dataset name to a loaded dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset '{name}' not found")]
    NotFound { name: String },

    #[error("dataset '{name}' could not be loaded: {source:#}")]
    Load {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("dataset '{name}' is empty")]
    Empty { name: String },
}
