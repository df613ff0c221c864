//! Serve CSV datasets ("niches") as filtered JSON records over HTTP.

pub mod config;
pub mod data;
pub mod http;

pub use config::{Cli, EmptyResultPolicy, ServerConfig};
pub use http::{build_router, AppState};
