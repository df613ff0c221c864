//! HTTP surface: router, shared state, and error mapping.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::data::cache::DatasetRegistry;
use crate::data::loader::CsvDirectory;
use crate::data::model::Dataset;

use self::error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub registry: Arc<DatasetRegistry>,
}

impl AppState {
    /// Build state backed by CSV files under `config.data_dir`.
    pub fn new(config: ServerConfig) -> Self {
        let registry = DatasetRegistry::new(
            CsvDirectory::new(config.data_dir.clone()),
            config.cache_capacity,
        );
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: ServerConfig, registry: DatasetRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Resolve a dataset through the registry, reading the file off the runtime.
    pub async fn dataset(&self, name: &str) -> Result<Arc<Dataset>, ApiError> {
        let registry = Arc::clone(&self.registry);
        let name = name.to_string();
        tokio::task::spawn_blocking(move || registry.get(&name))
            .await
            .map_err(|e| ApiError::Unavailable(format!("dataset load aborted: {e}")))?
            .map_err(ApiError::from)
    }

    /// Warm the cache with the default dataset. Failure is logged, not fatal:
    /// the server still starts and later requests retry the load.
    pub async fn preload(&self) -> Result<usize, ApiError> {
        match self.dataset(&self.config.default_dataset).await {
            Ok(ds) => {
                log::info!("preloaded default dataset ({} rows)", ds.len());
                Ok(ds.len())
            }
            Err(e) => {
                log::error!("preloading default dataset failed: {e}");
                Err(e)
            }
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/get_data", get(handlers::get_data))
        .route("/records", get(handlers::list_records))
        .route("/records/{niche}", get(handlers::records_segment))
        .route("/records/{niche}/{end_id}", get(handlers::niche_range))
        .route("/datasets/{niche}/search", get(handlers::search_niche))
        .with_state(state)
}
