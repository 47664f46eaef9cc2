use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use maestro_api::{
    booking::{DEFAULT_CUSTOMER_EMAIL, DEFAULT_CUSTOMER_ID},
    DEFAULT_EMAIL_BASE, DEFAULT_SCHEDULE_BASE, DEFAULT_TICKETING_BASE,
};
use serde::{Deserialize, Serialize};

const DEFAULT_LOCATIONS: [&str; 3] = ["Location 1", "Location 2", "Location 3"];

/// User-level settings loaded from `~/.config/movie-maestro/config.toml`
/// (platform-specific). Secrets never live here; they are in the encrypted
/// credential store under `data_dir`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Override for the directory holding the key and encrypted credentials.
    pub data_dir: Option<PathBuf>,
    /// Locations offered by the interactive session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    /// Base URLs of the remote services.
    pub apis: Option<ApiConfig>,
    /// Identity sent with bookings and confirmation emails.
    pub customer: Option<CustomerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub schedule_base: Option<String>,
    pub ticketing_base: Option<String>,
    pub email_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct CustomerConfig {
    pub id: Option<String>,
    pub email: Option<String>,
}

impl Config {
    /// Settings with every default spelled out, written by `config init`.
    pub fn starter() -> Self {
        let defaults = Config::default();
        Self {
            data_dir: None,
            locations: defaults.locations(),
            apis: Some(ApiConfig {
                schedule_base: Some(defaults.schedule_base()),
                ticketing_base: Some(defaults.ticketing_base()),
                email_base: Some(defaults.email_base()),
            }),
            customer: Some(CustomerConfig {
                id: Some(defaults.customer_id()),
                email: Some(defaults.customer_email()),
            }),
        }
    }

    pub fn locations(&self) -> Vec<String> {
        if self.locations.is_empty() {
            DEFAULT_LOCATIONS.iter().map(|l| l.to_string()).collect()
        } else {
            self.locations.clone()
        }
    }

    pub fn schedule_base(&self) -> String {
        self.api(|a| a.schedule_base.as_deref(), DEFAULT_SCHEDULE_BASE)
    }

    pub fn ticketing_base(&self) -> String {
        self.api(|a| a.ticketing_base.as_deref(), DEFAULT_TICKETING_BASE)
    }

    pub fn email_base(&self) -> String {
        self.api(|a| a.email_base.as_deref(), DEFAULT_EMAIL_BASE)
    }

    pub fn customer_id(&self) -> String {
        self.customer
            .as_ref()
            .and_then(|c| c.id.clone())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_ID.to_string())
    }

    pub fn customer_email(&self) -> String {
        self.customer
            .as_ref()
            .and_then(|c| c.email.clone())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_string())
    }

    fn api(&self, pick: impl Fn(&ApiConfig) -> Option<&str>, default: &str) -> String {
        self.apis
            .as_ref()
            .and_then(pick)
            .unwrap_or(default)
            .to_string()
    }
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("movie-maestro").join("config.toml"))
}

/// Write the given config to the default path unless a file is already there.
pub fn write_default_if_missing(config: &Config) -> Result<PathBuf> {
    write_to_path_if_missing(config, &default_path()?)
}

/// Never clobbers user edits: an existing file is left untouched.
pub fn write_to_path_if_missing(config: &Config, path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(config)?;
    fs::write(path, body)?;
    Ok(path.to_path_buf())
}
