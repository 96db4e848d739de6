use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Proxy used when nothing is configured.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// A fixed device location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,

    /// When false, location requests are refused as if permission was denied.
    #[serde(default = "default_allow")]
    pub allow: bool,
}

fn default_allow() -> bool {
    true
}

/// Client configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// proxy_url = "http://127.0.0.1:3000"
///
/// [location]
/// latitude = 48.8566
/// longitude = 2.3522
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub proxy_url: Option<String>,

    /// Absent means the device has no location capability.
    pub location: Option<LocationConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-proxy", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Proxy URL, preferring an explicit override over the stored value.
    pub fn resolve_proxy_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.proxy_url.as_deref())
            .unwrap_or(DEFAULT_PROXY_URL)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_default_proxy() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_proxy_url(None), DEFAULT_PROXY_URL);
        assert!(cfg.location.is_none());
    }

    #[test]
    fn override_beats_stored_proxy_url() {
        let cfg = Config {
            proxy_url: Some("http://stored:3000".into()),
            location: None,
        };
        assert_eq!(cfg.resolve_proxy_url(None), "http://stored:3000");
        assert_eq!(
            cfg.resolve_proxy_url(Some("http://flag:4000")),
            "http://flag:4000"
        );
    }

    #[test]
    fn parses_location_with_default_allow() {
        let cfg = Config::from_toml(
            r#"
            proxy_url = "http://127.0.0.1:3000"

            [location]
            latitude = 48.8566
            longitude = 2.3522
            "#,
        )
        .expect("config should parse");

        let loc = cfg.location.expect("location should be present");
        assert_eq!(loc.latitude, 48.8566);
        assert!(loc.allow);
    }

    #[test]
    fn toml_roundtrip_keeps_denied_location() {
        let cfg = Config {
            proxy_url: None,
            location: Some(LocationConfig {
                latitude: 1.5,
                longitude: -2.25,
                allow: false,
            }),
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
