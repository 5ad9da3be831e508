#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, TransportConfig};
use crate::domain::ports::MAX_TIMEOUT;
use crate::core::query::DEFAULT_PAGE_SIZE;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use std::time::Duration;
use toml_config::TomlConfig;

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_USER: &str = "API_USER";
pub const ENV_PASSWORD: &str = "API_PASSWORD";
pub const ENV_TIMEOUT_SECONDS: &str = "API_TIMEOUT_SECONDS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "API_ACCEPT_INVALID_CERTS";

pub const MAX_TIMEOUT_SECONDS: u64 = MAX_TIMEOUT.as_secs();

/// Resolved settings for one run: defaults, then the optional TOML file,
/// then the environment, then command line overrides.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub transport: TransportConfig,
    pub page_size: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            password: None,
            transport: TransportConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Overlay values from an environment lookup. Unset or empty variables
    /// leave the current value in place.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = Some(base_url);
        }
        if let Some(username) = get(ENV_USER) {
            self.username = Some(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECONDS) {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| PortalError::InvalidConfigValueError {
                    field: ENV_TIMEOUT_SECONDS.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            self.transport.timeout = Duration::from_secs(seconds);
        }
        if let Some(raw) = get(ENV_ACCEPT_INVALID_CERTS) {
            self.transport.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, &raw)?;
        }

        Ok(self)
    }

    pub fn with_file(mut self, file: &TomlConfig) -> Self {
        if let Some(api) = &file.api {
            if api.base_url.is_some() {
                self.base_url = api.base_url.clone();
            }
        }
        if let Some(auth) = &file.auth {
            if auth.username.is_some() {
                self.username = auth.username.clone();
            }
            if auth.password.is_some() {
                self.password = auth.password.clone();
            }
        }
        if let Some(transport) = &file.transport {
            if let Some(seconds) = transport.timeout_seconds {
                self.transport.timeout = Duration::from_secs(seconds);
            }
            if let Some(insecure) = transport.accept_invalid_certs {
                self.transport.accept_invalid_certs = insecure;
            }
            if let Some(user_agent) = &transport.user_agent {
                self.transport.user_agent = user_agent.clone();
            }
        }
        if let Some(page_size) = file.catalog.as_ref().and_then(|c| c.page_size) {
            self.page_size = page_size;
        }
        self
    }

    /// File (when given) then environment.
    pub fn load(file: Option<&TomlConfig>) -> Result<Self> {
        let base = match file {
            Some(file) => Self::default().with_file(file),
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }
}

fn parse_flag(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(PortalError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Expected true/false or 1/0".to_string(),
        }),
    }
}

impl ConfigProvider for PortalConfig {
    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn transport(&self) -> &TransportConfig {
        &self.transport
    }
}

impl Validate for PortalConfig {
    fn validate(&self) -> Result<()> {
        let base_url = validate_required_field(ENV_BASE_URL, self.base_url())?;
        validate_url(ENV_BASE_URL, base_url)?;
        validate_required_field(ENV_USER, self.username())?;
        validate_required_field(ENV_PASSWORD, self.password())?;
        validate_range(
            "transport.timeout_seconds",
            self.transport.timeout.as_secs(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_non_empty_string("transport.user_agent", &self.transport.user_agent)?;
        validate_range("catalog.page_size", self.page_size, 1, 100)?;
        Ok(())
    }
}
