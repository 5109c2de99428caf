use std::fs;
use std::path::{Path, PathBuf};

use super::validation::validate_config;
use super::{AppConfig, AuthMethod};
use crate::errors::{ConnRefError, Result};

pub const CONFIG_FILE_NAME: &str = ".connref.toml";

pub const ENV_DATAVERSE_URL: &str = "CONNREF_DATAVERSE_URL";
pub const ENV_CLIENT_SECRET: &str = "CONNREF_CLIENT_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "CONNREF_ACCESS_TOKEN";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find `.connref.toml` in `start` or one of its ancestors.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Parse config from a TOML string and validate it.
///
/// Environment overrides are not applied here; see [`apply_env_overrides`].
pub fn parse_and_validate_config(contents: &str) -> Result<AppConfig> {
    let config = toml::from_str::<AppConfig>(contents)
        .map_err(|e| ConnRefError::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    validate_or_report(&config, None)?;
    Ok(config)
}

/// Overlay values from the environment.
///
/// `lookup` abstracts `std::env::var` so tests do not have to touch process
/// state. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_DATAVERSE_URL) {
        config.platform.dataverse_url = url;
    }
    if let Some(secret) = non_empty(ENV_CLIENT_SECRET) {
        config.platform.client_secret = Some(secret);
    }
    if let Some(token) = non_empty(ENV_ACCESS_TOKEN) {
        config.platform.access_token = Some(token);
        // A token in the environment wins over an unconfigured secret.
        if config.platform.client_secret.is_none() {
            config.platform.auth_method = AuthMethod::AccessToken;
        }
    }
}

/// Load, override and validate the configuration.
///
/// With `explicit` set the file must exist; otherwise the current directory
/// and its ancestors are searched.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConnRefError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => {
            let current = std::env::current_dir()?;
            find_config_file(&current).ok_or_else(|| ConnRefError::ConfigNotFound {
                path: current.join(CONFIG_FILE_NAME),
            })?
        }
    };

    let contents = fs::read_to_string(&path)?;
    let mut config = toml::from_str::<AppConfig>(&contents).map_err(|e| {
        ConnRefError::config_with_path(format!("failed to parse {}: {e}", path.display()), &path)
    })?;
    log::debug!("Loaded config from {}", path.display());

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_or_report(&config, Some(&path))?;
    Ok(config)
}

fn validate_or_report(config: &AppConfig, path: Option<&Path>) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    let message = format!("invalid configuration:\n{message}");
    Err(match path {
        Some(path) => ConnRefError::config_with_path(message, path),
        None => ConnRefError::config(message),
    })
}
