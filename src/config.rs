use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::cache::DEFAULT_CACHE_CAPACITY;

/// Largest `limit` accepted by the record listing endpoints.
pub const MAX_LIMIT: usize = 1000;

/// What list-all and keyword search return when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmptyResultPolicy {
    /// `200` with `[]`.
    #[default]
    EmptyArray,
    /// `404` with a detail message.
    NotFound,
}

/// Command-line arguments; each flag also reads an environment variable.
#[derive(Debug, Parser)]
#[command(name = "niche-records")]
#[command(about = "Serve CSV datasets as filtered JSON records")]
#[command(version)]
pub struct Cli {
    /// Host address to bind to
    #[arg(long, env = "NICHE_RECORDS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind to
    #[arg(long, env = "NICHE_RECORDS_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding one `<niche>.csv` per dataset
    #[arg(long, env = "NICHE_RECORDS_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Dataset served by `/records`, `/records/{id}` and `/get_data`
    #[arg(long, env = "NICHE_RECORDS_DEFAULT_DATASET", default_value = "restro")]
    pub default_dataset: String,

    /// Maximum number of datasets held in memory
    #[arg(long, env = "NICHE_RECORDS_CACHE_CAPACITY", default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Response for list/search requests that match nothing
    #[arg(long, env = "NICHE_RECORDS_EMPTY_RESULTS", value_enum, default_value_t = EmptyResultPolicy::EmptyArray)]
    pub empty_results: EmptyResultPolicy,

    /// Load the default dataset before accepting requests
    #[arg(long)]
    pub preload: bool,
}

/// Runtime configuration shared by the router.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub default_dataset: String,
    pub cache_capacity: usize,
    pub empty_results: EmptyResultPolicy,
    pub preload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_dir: PathBuf::from("data"),
            default_dataset: "restro".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            empty_results: EmptyResultPolicy::default(),
            preload: false,
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            data_dir: cli.data_dir,
            default_dataset: cli.default_dataset,
            cache_capacity: cli.cache_capacity,
            empty_results: cli.empty_results,
            preload: cli.preload,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {addr}: {e}"))
    }
}
