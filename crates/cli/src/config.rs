//! API base URL and token resolution.
//!
//! Precedence for every value: explicit flag, then environment, then the
//! config file, then the built-in default. The resolver never reads the
//! process environment itself; callers pass a lookup so tests stay hermetic.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.thehumanpatternlab.com";

pub const ENV_BASE_URL: &str = "HPL_BASE_URL";
pub const ENV_BASE_URL_ALIAS: &str = "HPL_API_BASE_URL";
pub const ENV_TOKEN: &str = "HPL_TOKEN";
pub const ENV_CONTENT_REPO: &str = "HPL_CONTENT_REPO";
pub const ENV_CONTENT_REPO_ALIAS: &str = "SKULK_CONTENT_REPO";
pub const ENV_CONFIG: &str = "HPL_CONFIG";

/// On-disk shape of `~/.humanpatternlab/hpl.json`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub token: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn resolve_config(
    overrides: &ConfigOverrides,
    env: &dyn Fn(&str) -> Option<String>,
    file: &ConfigFile,
) -> ResolvedConfig {
    let base_url = non_empty(overrides.base_url.clone())
        .or_else(|| non_empty(env(ENV_BASE_URL)))
        .or_else(|| non_empty(env(ENV_BASE_URL_ALIAS)))
        .or_else(|| non_empty(file.api_base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let token = non_empty(overrides.token.clone())
        .or_else(|| non_empty(env(ENV_TOKEN)))
        .or_else(|| non_empty(file.token.clone()));

    ResolvedConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        token,
    }
}

/// Content repo from the flag, else `HPL_CONTENT_REPO`, else the legacy alias.
pub fn resolve_content_repo_arg(
    flag: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<String> {
    non_empty(flag.map(str::to_string))
        .or_else(|| non_empty(env(ENV_CONTENT_REPO)))
        .or_else(|| non_empty(env(ENV_CONTENT_REPO_ALIAS)))
}

pub fn config_path(env: &dyn Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(path) = non_empty(env(ENV_CONFIG)) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".humanpatternlab").join("hpl.json"))
}

/// A missing file is an empty config; an unreadable one is logged and
/// treated the same way.
pub fn load_config_file(path: &Path) -> ConfigFile {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return ConfigFile::default(),
        Err(err) => {
            log::warn!("Ignoring config file {}: {err}", path.display());
            return ConfigFile::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring invalid config file {}: {err}", path.display());
            ConfigFile::default()
        }
    }
}

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
