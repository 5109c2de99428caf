//! Configuration validation.
//!
//! Validation collects every problem instead of stopping at the first one so
//! a user can fix a config file in a single pass.

use super::{AppConfig, AuthMethod};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    let platform = &config.platform;

    let url = platform.dataverse_url.trim();
    if url.is_empty() {
        errors.push(ConfigValidationError::new(
            "platform.dataverse_url",
            "must not be empty",
        ));
    } else if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(ConfigValidationError::new(
            "platform.dataverse_url",
            format!("'{url}' must start with http:// or https://"),
        ));
    }

    match platform.auth_method {
        AuthMethod::ClientCredentials => {
            if platform.tenant_id.trim().is_empty() {
                errors.push(ConfigValidationError::new(
                    "platform.tenant_id",
                    "required for client_credentials authentication",
                ));
            }
            if platform.client_id.trim().is_empty() {
                errors.push(ConfigValidationError::new(
                    "platform.client_id",
                    "required for client_credentials authentication",
                ));
            }
            if platform
                .client_secret
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
            {
                errors.push(ConfigValidationError::new(
                    "platform.client_secret",
                    "required for client_credentials authentication (or set CONNREF_CLIENT_SECRET)",
                ));
            }
        }
        AuthMethod::AccessToken => {
            if platform
                .access_token
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
            {
                errors.push(ConfigValidationError::new(
                    "platform.access_token",
                    "required for access_token authentication (or set CONNREF_ACCESS_TOKEN)",
                ));
            }
        }
    }

    let refs = &config.connection_references;
    if refs.prefix.trim().is_empty() {
        errors.push(ConfigValidationError::new(
            "connection_references.prefix",
            "must not be empty",
        ));
    }

    for (provider, mapping) in &refs.provider_mappings {
        if mapping.connector_id.trim().is_empty() {
            errors.push(ConfigValidationError::new(
                "connection_references.provider_mappings",
                format!("'{provider}' has an empty connector_id"),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderMapping;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.platform.dataverse_url = "https://contoso.crm.dynamics.com".into();
        config.platform.tenant_id = "tenant".into();
        config.platform.client_id = "client".into();
        config.platform.client_secret = Some("secret".into());
        config
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        assert!(validate_config(&valid_config()).is_empty());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = valid_config();
        config.platform.dataverse_url = "contoso.crm.dynamics.com".into();
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "platform.dataverse_url");
    }

    #[test]
    fn test_client_credentials_requires_secret() {
        let mut config = valid_config();
        config.platform.client_secret = None;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "platform.client_secret");
    }

    #[test]
    fn test_access_token_mode_ignores_client_fields() {
        let mut config = valid_config();
        config.platform.tenant_id.clear();
        config.platform.client_id.clear();
        config.platform.client_secret = None;
        config.platform.auth_method = AuthMethod::AccessToken;
        config.platform.access_token = Some("token".into());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_collects_multiple_errors() {
        let mut config = AppConfig::default();
        config.connection_references.prefix = " ".into();
        config.connection_references.provider_mappings.insert(
            "shared_sql".into(),
            ProviderMapping {
                connection_id: "conn".into(),
                connector_id: "".into(),
            },
        );

        let fields: Vec<_> = validate_config(&config).iter().map(|e| e.field).collect();
        assert!(fields.contains(&"platform.dataverse_url"));
        assert!(fields.contains(&"platform.tenant_id"));
        assert!(fields.contains(&"platform.client_id"));
        assert!(fields.contains(&"platform.client_secret"));
        assert!(fields.contains(&"connection_references.prefix"));
        assert!(fields.contains(&"connection_references.provider_mappings"));
    }
}
