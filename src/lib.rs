pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::PortalConfig;
pub use self::core::client::CatalogClient;
pub use self::core::service::{get_catalog, CatalogService};
pub use domain::model::{CatalogEntry, Credentials, Token};
pub use utils::error::{PortalError, Result};

/// Outcome of one catalog retrieval: the entries in upstream order, or the
/// error that stopped the chain.
pub type FetchResult = Result<Vec<CatalogEntry>>;
