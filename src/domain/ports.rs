use crate::domain::model::{CatalogEntry, Credentials, Token};
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP transport settings handed to the client constructor. TLS
/// verification is only ever relaxed through this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            user_agent: concat!("portal-catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Validate for TransportConfig {
    /// Timeout must be non-zero and at most `MAX_TIMEOUT`.
    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() || self.timeout > MAX_TIMEOUT {
            return Err(PortalError::InvalidConfigValueError {
                field: "transport.timeout_seconds".to_string(),
                value: format!("{:?}", self.timeout),
                reason: format!("Timeout must be greater than 0 and at most {:?}", MAX_TIMEOUT),
            });
        }
        validate_non_empty_string("transport.user_agent", &self.user_agent)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> Option<&str>;
    fn username(&self) -> Option<&str>;
    fn password(&self) -> Option<&str>;
    fn transport(&self) -> &TransportConfig;

    fn credentials(&self) -> Result<Credentials> {
        let username = validate_required_field("API_USER", self.username())?;
        let password = validate_required_field("API_PASSWORD", self.password())?;
        Ok(Credentials::new(username, password))
    }
}

/// The two upstream calls. Implemented over HTTP by `CatalogClient`.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Token>;
    async fn fetch_catalog(&self, token: &Token) -> Result<Vec<CatalogEntry>>;
}
