use std::path::{Path, PathBuf};
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::asset_id::IdScheme;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub asset_id: AssetIdConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Origins allowed to call the API from a browser. Empty disables CORS.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

/// Letters preceding the device code in every allocated identifier
#[derive(Debug, Clone, Deserialize)]
pub struct AssetIdConfig {
    #[serde(default = "default_organization")]
    pub organization: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_listen() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/var/lib/asset-tracker/assets.db")
}

fn default_organization() -> String {
    "UB".to_string()
}

fn default_department() -> String {
    "IT".to_string()
}

fn default_prefix() -> String {
    "AST".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for AssetIdConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            department: default_department(),
            prefix: default_prefix(),
        }
    }
}

impl AssetIdConfig {
    pub fn scheme(&self) -> Result<IdScheme> {
        IdScheme::new(&self.organization, &self.department, &self.prefix)
            .context("Invalid [asset_id] settings")
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        // Reject a bad scheme at startup rather than on first create
        config.asset_id.scheme()?;
        Ok(config)
    }
}
