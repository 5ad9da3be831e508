use crate::utils::error::{PortalError, Result};
use regex::Regex;
use url::Url;

/// `${VAR}` placeholder as written in config files.
pub const PLACEHOLDER_PATTERN: &str = r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.trim().is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(PortalError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Present and not blank. Missing and blank are both reported as missing
/// so that an empty `API_USER=` behaves like an unset one. A value still
/// holding a `${VAR}` placeholder is reported as missing `VAR`.
pub fn validate_required_field<'a>(field_name: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if let Some(var_name) = unresolved_placeholder(v)? {
                return Err(PortalError::MissingConfigError { field: var_name });
            }
            Ok(v)
        }
        _ => Err(PortalError::MissingConfigError {
            field: field_name.to_string(),
        }),
    }
}

/// Name of the first `${VAR}` placeholder left in `value`, if any.
pub fn unresolved_placeholder(value: &str) -> Result<Option<String>> {
    if !value.contains("${") {
        return Ok(None);
    }
    let re = Regex::new(PLACEHOLDER_PATTERN).map_err(|e| PortalError::ConfigError {
        message: format!("Invalid placeholder pattern: {}", e),
    })?;
    Ok(re.captures(value).map(|caps| caps[1].to_string()))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PortalError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("API_BASE_URL", "https://example.com/api").is_ok());
        assert!(validate_url("API_BASE_URL", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("API_BASE_URL", "").is_err());
        assert!(validate_url("API_BASE_URL", "not a url").is_err());
        assert!(validate_url("API_BASE_URL", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        assert_eq!(validate_required_field("API_USER", Some("portaledi")).unwrap(), "portaledi");
        assert!(matches!(
            validate_required_field("API_USER", Some("   ")),
            Err(PortalError::MissingConfigError { .. })
        ));
        assert!(matches!(
            validate_required_field("API_USER", None),
            Err(PortalError::MissingConfigError { field }) if field == "API_USER"
        ));
    }

    #[test]
    fn test_unresolved_placeholder_is_missing() {
        assert!(matches!(
            validate_required_field("API_PASSWORD", Some("${PORTAL_PASSWORD}")),
            Err(PortalError::MissingConfigError { field }) if field == "PORTAL_PASSWORD"
        ));
        assert!(matches!(
            validate_required_field("API_BASE_URL", Some("https://${PORTAL_HOST}/api")),
            Err(PortalError::MissingConfigError { field }) if field == "PORTAL_HOST"
        ));
        assert_eq!(validate_required_field("API_PASSWORD", Some("pa$$word")).unwrap(), "pa$$word");
        assert_eq!(unresolved_placeholder("plain").unwrap(), None);
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_range("timeout_seconds", 301, 1, 300).is_err());
    }
}
