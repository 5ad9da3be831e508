use crate::core::client::CatalogClient;
use crate::core::{CatalogApi, ConfigProvider, Credentials, Token};
use crate::utils::error::Result;
use crate::FetchResult;

/// Log in, then fetch with the token just obtained. A failed login returns
/// before the catalog endpoint is contacted, and a rejected token on the
/// catalog call is returned as is.
pub async fn login_then_fetch<A>(api: &A, credentials: &Credentials) -> FetchResult
where
    A: CatalogApi + ?Sized,
{
    let token = api.authenticate(credentials).await?;
    tracing::info!("🔑 Authenticated as {}", credentials.username);

    let entries = api.fetch_catalog(&token).await?;
    tracing::info!("📦 Fetched {} catalog entries", entries.len());
    Ok(entries)
}

pub struct CatalogService<A: CatalogApi> {
    api: A,
    credentials: Credentials,
}

impl CatalogService<CatalogClient> {
    /// Resolves credentials and the base URL before anything touches the
    /// network.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let credentials = config.credentials()?;
        let client = CatalogClient::from_config(config)?;
        Ok(Self::new(client, credentials))
    }
}

impl<A: CatalogApi> CatalogService<A> {
    pub fn new(api: A, credentials: Credentials) -> Self {
        Self { api, credentials }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn login(&self) -> Result<Token> {
        self.api.authenticate(&self.credentials).await
    }

    pub async fn get_catalog(&self) -> FetchResult {
        login_then_fetch(&self.api, &self.credentials).await
    }
}

/// One-shot catalog retrieval from configuration.
pub async fn get_catalog<C: ConfigProvider>(config: &C) -> FetchResult {
    CatalogService::<CatalogClient>::from_config(config)?
        .get_catalog()
        .await
}
