use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# connref configuration

[platform]
dataverse_url = "https://your-org.crm.dynamics.com"
tenant_id = ""
client_id = ""
# client_secret = ""            # or set CONNREF_CLIENT_SECRET
auth_method = "client_credentials" # or "access_token"
# access_token = ""             # or set CONNREF_ACCESS_TOKEN

[connection_references]
prefix = "new"

# One table per provider used by your flows.
# [connection_references.provider_mappings.shared_sql]
# connection_id = ""
# connector_id = "/providers/Microsoft.PowerApps/apis/shared_sql"
"#;

/// Write a starter `.connref.toml` into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    Ok(config_path)
}

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    #[test]
    fn test_writes_parseable_config() {
        let temp = TempDir::new().unwrap();
        let path = init_config_in(temp.path(), false).unwrap();

        let parsed: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.connection_references.prefix, "new");
        assert!(parsed.connection_references.provider_mappings.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "custom").unwrap();

        assert!(init_config_in(temp.path(), false).is_err());
        init_config_in(temp.path(), true).unwrap();
        assert!(fs::read_to_string(temp.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .contains("[platform]"));
    }
}
