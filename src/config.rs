use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    CHECK_INTERVAL_OPTIONS, DEFAULT_API_URL, DEFAULT_CHECK_INTERVAL_HOURS,
    DEFAULT_GRACE_PERIOD_MS, MAX_GRACE_PERIOD_SECS,
};

/// Environment variable overriding `server.api_url`
pub const API_URL_ENV: &str = "MAILSWEEP_API_URL";

/// Environment variable supplying the bearer token
pub const TOKEN_ENV: &str = "MAILSWEEP_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub actions: ActionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token from the login flow (prefer MAILSWEEP_TOKEN)
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Seconds a confirmed delete waits before it is committed
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    /// Commit still-pending deletes when the app exits
    #[serde(default = "default_true")]
    pub flush_on_exit: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            flush_on_exit: true,
        }
    }
}

impl ActionConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub keybinding_mode: KeybindingMode,
    /// How often the service checks mail, in hours (3, 6, 12 or 24)
    #[serde(default = "default_check_interval_hours")]
    pub check_interval_hours: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            keybinding_mode: KeybindingMode::default(),
            check_interval_hours: default_check_interval_hours(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingMode {
    #[default]
    Vim,
    Arrows,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD_MS / 1000
}

fn default_check_interval_hours() -> u32 {
    DEFAULT_CHECK_INTERVAL_HOURS
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mailsweep");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    /// Environment overrides are applied afterwards.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Config::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.server.api_url = url;
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !CHECK_INTERVAL_OPTIONS.contains(&self.ui.check_interval_hours) {
            anyhow::bail!(
                "ui.check_interval_hours must be one of {:?}, got {}",
                CHECK_INTERVAL_OPTIONS,
                self.ui.check_interval_hours
            );
        }
        if self.actions.grace_period_secs > MAX_GRACE_PERIOD_SECS {
            anyhow::bail!(
                "actions.grace_period_secs must be at most {}, got {}",
                MAX_GRACE_PERIOD_SECS,
                self.actions.grace_period_secs
            );
        }
        Ok(())
    }

    /// Bearer token: environment first, then config file
    pub fn token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.server.token.clone())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [server]
            api_url = "https://assistant.example.com"
            token = "abc123"

            [actions]
            grace_period_secs = 30
            flush_on_exit = false

            [ui]
            keybinding_mode = "arrows"
            check_interval_hours = 6
        "#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.server.api_url, "https://assistant.example.com");
        assert_eq!(config.server.token.as_deref(), Some("abc123"));
        assert_eq!(config.actions.grace_period(), Duration::from_secs(30));
        assert!(!config.actions.flush_on_exit);
        assert_eq!(config.ui.keybinding_mode, KeybindingMode::Arrows);
        assert_eq!(config.ui.check_interval_hours, 6);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.api_url, "http://localhost:3001");
        assert!(config.server.token.is_none());
        assert_eq!(config.actions.grace_period(), Duration::from_secs(120));
        assert!(config.actions.flush_on_exit);
        assert_eq!(config.ui.check_interval_hours, 12);
        assert_eq!(config.ui.keybinding_mode, KeybindingMode::Vim);
    }

    #[test]
    fn test_invalid_check_interval_rejected() {
        let toml = r#"
            [ui]
            check_interval_hours = 5
        "#;
        let err = Config::parse(toml).unwrap_err();
        assert!(err.to_string().contains("check_interval_hours"));
    }

    #[test]
    fn test_grace_period_out_of_range_rejected() {
        let toml = r#"
            [actions]
            grace_period_secs = 9223372036854775807
        "#;
        let err = Config::parse(toml).unwrap_err();
        assert!(err.to_string().contains("grace_period_secs"));

        let max = format!("[actions]\ngrace_period_secs = {}", MAX_GRACE_PERIOD_SECS);
        let config = Config::parse(&max).unwrap();
        assert_eq!(config.actions.grace_period(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.actions.grace_period_secs = 10;
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse(&content).unwrap();
        assert_eq!(parsed.actions.grace_period_secs, 10);
    }
}
