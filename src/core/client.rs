use crate::core::service::login_then_fetch;
use crate::core::{CatalogApi, CatalogEntry, ConfigProvider, Credentials, Token, TransportConfig};
use crate::domain::model::LoginResponse;
use crate::utils::error::{Operation, PortalError, Result};
use crate::utils::validation::{validate_required_field, validate_url, Validate};
use crate::FetchResult;
use async_trait::async_trait;
use reqwest::{header, Client};

pub const LOGIN_PATH: &str = "authenticate/login";
pub const CATALOG_PATH: &str = "CatalogoServicios";

/// HTTP client for the upstream identity and catalog endpoints.
///
/// Every call is independent: no token is cached between calls and nothing
/// is retried.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self> {
        validate_url("API_BASE_URL", base_url)?;
        transport.validate()?;

        if transport.accept_invalid_certs {
            tracing::warn!("⚠️ TLS certificate verification is disabled for {}", base_url);
        }

        let client = Client::builder()
            .timeout(transport.timeout)
            .danger_accept_invalid_certs(transport.accept_invalid_certs)
            .user_agent(transport.user_agent.as_str())
            .build()
            .map_err(|e| PortalError::ConfigError {
                message: format!("Could not build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = validate_required_field("API_BASE_URL", config.base_url())?;
        Self::new(base_url, config.transport())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}/{}", self.base_url, LOGIN_PATH)
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/{}", self.base_url, CATALOG_PATH)
    }

    /// Log in and fetch the catalog with the fresh token.
    pub async fn get_catalog(&self, credentials: &Credentials) -> FetchResult {
        login_then_fetch(self, credentials).await
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Token> {
        validate_required_field("API_USER", Some(credentials.username.as_str()))?;
        validate_required_field("API_PASSWORD", Some(credentials.password.as_str()))?;

        let url = self.login_url();
        tracing::debug!("📡 POST {} as {}", url, credentials.username);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|source| PortalError::NetworkError {
                operation: Operation::Login,
                source,
            })?;

        let status = response.status();
        tracing::debug!("Login response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| PortalError::NetworkError {
                operation: Operation::Login,
                source,
            })?;

        if !status.is_success() {
            tracing::error!("❌ Login rejected: {}", status);
            return Err(PortalError::AuthRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = serde_json::from_str::<LoginResponse>(&body)
            .ok()
            .and_then(|resp| resp.token)
            .map(Token::new)
            .filter(|token| !token.is_blank());

        match token {
            Some(token) => {
                tracing::debug!("Token obtained: {}", token.preview(8));
                Ok(token)
            }
            None => {
                tracing::error!("❌ Login succeeded with {} but no token was returned", status);
                Err(PortalError::MalformedTokenResponse {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn fetch_catalog(&self, token: &Token) -> Result<Vec<CatalogEntry>> {
        if token.is_blank() {
            return Err(PortalError::ConfigError {
                message: "Cannot fetch the catalog without a token".to_string(),
            });
        }

        let url = self.catalog_url();
        tracing::debug!("📡 GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| PortalError::NetworkError {
                operation: Operation::FetchCatalog,
                source,
            })?;

        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| PortalError::NetworkError {
                operation: Operation::FetchCatalog,
                source,
            })?;

        if !status.is_success() {
            tracing::error!("❌ Catalog request failed: {}", status);
            return Err(PortalError::CatalogFetchError {
                status: status.as_u16(),
                body,
            });
        }

        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&body).map_err(|source| PortalError::CatalogDecodeError {
                status: status.as_u16(),
                source,
            })?;

        tracing::debug!("Decoded {} catalog entries", entries.len());
        Ok(entries)
    }
}
