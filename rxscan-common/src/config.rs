//! Configuration loading and resolution
//!
//! Every setting resolves in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are merged by clap (`#[arg(env = ...)]`) in each binary;
//! this module provides tier 3 and the resolution helper.
//!
//! A missing config file is not an error: services start with defaults.
//! A config file that exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RXSCAN_CONFIG";

/// Top-level TOML configuration shared by both services
///
/// Each service reads only the sections it needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiSection,
    pub ocr: OcrSection,
    pub ner: NerSection,
    pub ui: UiSection,
    pub smtp: SmtpSection,
    pub logging: LoggingConfig,
}

/// `[api]` backend listener settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
}

/// `[ocr]` cloud text-detection settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OcrSection {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[ner]` inference endpoint settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NerSection {
    /// General-purpose NER endpoint (PRODUCT/ORG labels)
    pub general_url: Option<String>,
    /// Domain (biomedical) token-classification endpoint
    pub medical_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[ui]` frontend gateway settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend_url: Option<String>,
    pub backend_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
}

/// `[smtp]` notification transport settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SmtpSection {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[logging]` settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter directive when RUST_LOG is unset
    pub level: Option<String>,
}

impl TomlConfig {
    /// Load configuration, tolerating a missing file
    ///
    /// `explicit` is the `--config` argument (or `RXSCAN_CONFIG`, merged by
    /// clap). When it is `None` the platform config location is tried.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit.is_some() {
                warn!("Config file {} not found; using defaults", path.display());
            } else {
                info!("No config file at {}; using defaults", path.display());
            }
            return Ok(Self::default());
        }

        let config = load_toml_config(&path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location: `<config_dir>/rxscan/config.toml`
///
/// On Linux `/etc/rxscan/config.toml` is used when the user file is absent.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("rxscan").join("config.toml"));

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/rxscan/config.toml");
        match user_config {
            Some(path) if path.exists() => Some(path),
            _ if system_config.exists() => Some(system_config),
            other => other,
        }
    } else {
        user_config
    }
}

/// Resolve one setting: CLI/ENV value, then TOML value, then default
pub fn resolve<T>(cli_or_env: Option<T>, toml_value: Option<T>, default: T) -> T {
    cli_or_env.or(toml_value).unwrap_or(default)
}

/// Like [`resolve`] but with no compiled default; blank strings count as unset
pub fn resolve_optional(cli_or_env: Option<String>, toml_value: Option<String>) -> Option<String> {
    cli_or_env
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_value.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_priority() {
        assert_eq!(resolve(Some(1), Some(2), 3), 1);
        assert_eq!(resolve(None, Some(2), 3), 2);
        assert_eq!(resolve(None::<u16>, None, 3), 3);
    }

    #[test]
    fn test_resolve_optional_skips_blank() {
        assert_eq!(
            resolve_optional(Some("  ".to_string()), Some("toml".to_string())),
            Some("toml".to_string())
        );
        assert_eq!(resolve_optional(None, Some(String::new())), None);
        assert_eq!(
            resolve_optional(Some("cli".to_string()), Some("toml".to_string())),
            Some("cli".to_string())
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }
}
