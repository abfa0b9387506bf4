//! Application configuration management.
//!
//! Configuration is stored at `~/.config/fxadmin/config.json` and holds the
//! backend base URL plus the last email used to sign in. The `FXADMIN_API_URL`
//! environment variable overrides the stored URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "fxadmin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend used when nothing is configured.
const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolved backend base URL: env var, then config file, then the
    /// default. Trailing slashes are trimmed so path joins stay clean.
    pub fn api_base_url(&self) -> String {
        let raw = std::env::var("FXADMIN_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        raw.trim_end_matches('/').to_string()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory where the session file lives (same as the config dir).
    pub fn session_dir() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_default_and_trim() {
        // Env var handling is exercised manually; here only the stored/default path.
        std::env::remove_var("FXADMIN_API_URL");

        let config = Config::default();
        assert_eq!(config.api_base_url(), DEFAULT_API_URL);

        let config = Config {
            api_base_url: Some("https://api.example.com/v1///".to_string()),
            last_email: None,
        };
        assert_eq!(config.api_base_url(), "https://api.example.com/v1");
    }
}
