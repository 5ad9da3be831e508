use crate::utils::error::{PortalError, Result};
use crate::utils::validation::PLACEHOLDER_PATTERN;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every section and key may be omitted.
///
/// ```toml
/// [api]
/// base_url = "https://certificados.example.gob.ar/apiportaledi/api"
///
/// [auth]
/// username = "${API_USER}"
/// password = "${API_PASSWORD}"
///
/// [transport]
/// timeout_seconds = 20
/// accept_invalid_certs = false
///
/// [catalog]
/// page_size = 9
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub api: Option<ApiSection>,
    pub auth: Option<AuthSection>,
    pub transport: Option<TransportSection>,
    pub catalog: Option<CatalogSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSection {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportSection {
    pub timeout_seconds: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    pub page_size: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, |name| std::env::var(name).ok())?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders. Unknown variables are left untouched;
    /// `validate_required_field` reports a leftover one as a missing `VAR`.
    pub fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| {
            PortalError::ConfigError {
                message: format!("Invalid placeholder pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://example.gob.ar/apiportaledi/api"

[transport]
timeout_seconds = 10
accept_invalid_certs = true
"#,
        )
        .unwrap();

        assert_eq!(
            config.api.unwrap().base_url.as_deref(),
            Some("https://example.gob.ar/apiportaledi/api")
        );
        let transport = config.transport.unwrap();
        assert_eq!(transport.timeout_seconds, Some(10));
        assert_eq!(transport.accept_invalid_certs, Some(true));
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_placeholder_substitution() {
        let out = TomlConfig::substitute_env_vars(
            r#"username = "${PORTAL_TEST_USER}"
password = "${PORTAL_TEST_UNSET}""#,
            |name| (name == "PORTAL_TEST_USER").then(|| "portaledi".to_string()),
        )
        .unwrap();

        assert!(out.contains(r#"username = "portaledi""#));
        assert!(out.contains("${PORTAL_TEST_UNSET}"));
    }

    #[test]
    fn test_unknown_section_is_an_error() {
        let err = TomlConfig::from_toml_str("[pipeline]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, PortalError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[catalog]\npage_size = 18\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.catalog.unwrap().page_size, Some(18));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/nonexistent/portal.toml").unwrap_err();
        assert!(matches!(err, PortalError::IoError(_)));
    }
}
