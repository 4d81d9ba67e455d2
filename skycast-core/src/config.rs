use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_ENDPOINT: &str = "https://weatherapi-com.p.rapidapi.com/forecast.json";
pub const DEFAULT_API_HOST: &str = "weatherapi-com.p.rapidapi.com";
pub const DEFAULT_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const DEFAULT_HOST_HEADER: &str = "X-RapidAPI-Host";
pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org";

/// Credentials and endpoint of the weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_host: String,
    pub key_header: String,
    pub host_header: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            key_header: DEFAULT_KEY_HEADER.to_string(),
            host_header: DEFAULT_HOST_HEADER.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub base_url: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_GEOCODE_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// City shown when none is given on the command line.
    pub default_city: Option<String>,

    /// Example TOML:
    /// [api]
    /// api_key = "..."
    pub api: ApiConfig,

    pub geocode: GeocodeConfig,
}

impl Config {
    /// Provider settings, or an error if no API key has been configured.
    pub fn api_config(&self) -> Result<&ApiConfig> {
        if !self.api.is_configured() {
            return Err(anyhow!(
                "No API key configured.\n\
                 Hint: run `skycast configure` or set SKYCAST_API_KEY."
            ));
        }

        Ok(&self.api)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api.api_key = api_key;
    }

    /// Store the default city; blank input clears it.
    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        self.default_city = if city.is_empty() { None } else { Some(city.to_string()) };
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
