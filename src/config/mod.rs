//! Configuration for connref.
//!
//! Settings come from a `.connref.toml` file (found by walking up from the
//! current directory, or given explicitly with `--config`), then selected
//! values can be overridden from the environment so that secrets need not
//! live in the file.
//!
//! ```toml
//! [platform]
//! dataverse_url = "https://contoso.crm.dynamics.com"
//! tenant_id = "00000000-0000-0000-0000-000000000000"
//! client_id = "11111111-1111-1111-1111-111111111111"
//! auth_method = "client_credentials"
//!
//! [connection_references]
//! prefix = "new"
//!
//! [connection_references.provider_mappings.shared_sql]
//! connection_id = "3f2a..."
//! connector_id = "/providers/Microsoft.PowerApps/apis/shared_sql"
//! ```

mod loader;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use loader::{
    apply_env_overrides, directory_ancestors, find_config_file, load_config,
    parse_and_validate_config, CONFIG_FILE_NAME, ENV_ACCESS_TOKEN, ENV_CLIENT_SECRET,
    ENV_DATAVERSE_URL,
};
pub use validation::{validate_config, ConfigValidationError};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Remote store connection and authentication
    #[serde(default)]
    pub platform: PlatformSettings,

    /// Naming prefix and provider mappings
    #[serde(default)]
    pub connection_references: ConnectionReferenceSettings,
}

/// How the access token for the remote store is obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// OAuth2 client credentials grant (service principal)
    #[default]
    ClientCredentials,
    /// A token acquired out of band and handed over verbatim
    AccessToken,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformSettings {
    /// Environment URL, e.g. `https://contoso.crm.dynamics.com`
    #[serde(default)]
    pub dataverse_url: String,

    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub auth_method: AuthMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Identity provider host used to build the token endpoint
    #[serde(default = "default_authority_host")]
    pub authority_host: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            dataverse_url: String::new(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: None,
            auth_method: AuthMethod::default(),
            access_token: None,
            authority_host: default_authority_host(),
        }
    }
}

pub fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionReferenceSettings {
    /// Case-sensitive prefix for generated names
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Provider identifier (e.g. `shared_sql`) to target connection
    #[serde(default)]
    pub provider_mappings: BTreeMap<String, ProviderMapping>,
}

impl Default for ConnectionReferenceSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            provider_mappings: BTreeMap::new(),
        }
    }
}

impl ConnectionReferenceSettings {
    /// Mapping configured for a provider, if any.
    pub fn mapping_for(&self, provider: &str) -> Option<&ProviderMapping> {
        self.provider_mappings.get(provider)
    }
}

pub fn default_prefix() -> String {
    "new".to_string()
}

/// Target connection for one provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderMapping {
    pub connection_id: String,
    pub connector_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.connection_references.prefix, "new");
        assert_eq!(config.platform.auth_method, AuthMethod::ClientCredentials);
        assert_eq!(
            config.platform.authority_host,
            "https://login.microsoftonline.com"
        );
        assert!(config.connection_references.provider_mappings.is_empty());
    }

    #[test]
    fn test_mapping_lookup_is_exact() {
        let mut settings = ConnectionReferenceSettings::default();
        settings.provider_mappings.insert(
            "shared_sql".into(),
            ProviderMapping {
                connection_id: "conn-1".into(),
                connector_id: "connector-sql".into(),
            },
        );

        assert_eq!(
            settings.mapping_for("shared_sql").map(|m| m.connection_id.as_str()),
            Some("conn-1")
        );
        assert!(settings.mapping_for("SHARED_SQL").is_none());
        assert!(settings.mapping_for("shared_office365").is_none());
    }
}
