pub mod client;
pub mod query;
pub mod service;

pub use crate::domain::model::{CatalogEntry, Credentials, Token};
pub use crate::domain::ports::{CatalogApi, ConfigProvider, TransportConfig};
pub use crate::utils::error::Result;
