use std::fmt;
use thiserror::Error;

/// Which upstream call a transport failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    FetchCatalog,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Login => write!(f, "login"),
            Operation::FetchCatalog => write!(f, "catalog fetch"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Login rejected with HTTP status {status}")]
    AuthRejected { status: u16, body: String },

    #[error("Login response (HTTP {status}) did not contain a token")]
    MalformedTokenResponse { status: u16, body: String },

    #[error("Network error during {operation}: {source}")]
    NetworkError {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Catalog request failed with HTTP status {status}")]
    CatalogFetchError { status: u16, body: String },

    #[error("Catalog response (HTTP {status}) could not be decoded: {source}")]
    CatalogDecodeError {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Auth,
    Network,
    CatalogFetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::MissingConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::ConfigError { .. }
            | PortalError::IoError(_) => ErrorCategory::Config,
            PortalError::AuthRejected { .. } | PortalError::MalformedTokenResponse { .. } => {
                ErrorCategory::Auth
            }
            PortalError::NetworkError { .. } => ErrorCategory::Network,
            PortalError::CatalogFetchError { .. } | PortalError::CatalogDecodeError { .. } => {
                ErrorCategory::CatalogFetch
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::Critical,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Auth | ErrorCategory::CatalogFetch => ErrorSeverity::High,
        }
    }

    /// HTTP status of the upstream response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::AuthRejected { status, .. }
            | PortalError::MalformedTokenResponse { status, .. }
            | PortalError::CatalogFetchError { status, .. }
            | PortalError::CatalogDecodeError { status, .. } => Some(*status),
            PortalError::NetworkError { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw upstream body kept for diagnostics.
    pub fn body(&self) -> Option<&str> {
        match self {
            PortalError::AuthRejected { body, .. }
            | PortalError::MalformedTokenResponse { body, .. }
            | PortalError::CatalogFetchError { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PortalError::NetworkError { source, .. } if source.is_timeout())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured.", field)
            }
            PortalError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}.", field, reason)
            }
            PortalError::ConfigError { message } => message.clone(),
            PortalError::AuthRejected { status, .. } => {
                format!("Could not authenticate with the API (HTTP {}).", status)
            }
            PortalError::MalformedTokenResponse { .. } => {
                "The API accepted the login but returned no token.".to_string()
            }
            PortalError::NetworkError { operation, .. } if self.is_timeout() => {
                format!("The API did not answer in time during {}.", operation)
            }
            PortalError::NetworkError { operation, .. } => {
                format!("Network error while connecting to the API during {}.", operation)
            }
            PortalError::CatalogFetchError { status, .. } => format!("API error: {}", status),
            PortalError::CatalogDecodeError { .. } => {
                "The catalog returned by the API is not in the expected format.".to_string()
            }
            PortalError::IoError(e) => format!("Could not read a local file: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PortalError::MissingConfigError { .. } => {
                "Set API_BASE_URL, API_USER and API_PASSWORD, or provide them in the config file"
            }
            PortalError::InvalidConfigValueError { .. } | PortalError::ConfigError { .. } => {
                "Check the configuration values and try again"
            }
            PortalError::AuthRejected { status: 400, .. } => {
                "The login body was rejected; confirm the API still expects Username/Password"
            }
            PortalError::AuthRejected { .. } => "Verify API_USER and API_PASSWORD",
            PortalError::MalformedTokenResponse { .. } => {
                "Inspect the login response body with the `login` command"
            }
            PortalError::NetworkError { .. } => {
                "Check connectivity and TLS settings, then run the command again"
            }
            PortalError::CatalogFetchError { status: 401 | 403, .. } => {
                "The token was not accepted; run the command again to log in anew"
            }
            PortalError::CatalogFetchError { .. } | PortalError::CatalogDecodeError { .. } => {
                "The catalog service may be unavailable; try again later"
            }
            PortalError::IoError(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
