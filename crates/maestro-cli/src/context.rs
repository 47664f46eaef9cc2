use std::path::PathBuf;

use color_eyre::Result;
use dirs::data_dir;
use maestro_api::{BookingClient, BookingClientConfig, ScheduleClient};
use maestro_core::credentials::Credentials;
use maestro_storage::{config_store::ConfigStore, key_provider::KeyFileProvider};
use tracing::{debug, warn};

use crate::config::Config;

/// Everything a command needs, built once at startup and passed by reference.
pub struct AppContext {
    pub schedules: ScheduleClient,
    pub booking: BookingClient,
    pub locations: Vec<String>,
}

impl AppContext {
    /// Loads (or initializes) the encrypted credentials and builds the clients.
    /// Any failure here must stop the program before it talks to the user.
    pub fn load(config: &Config) -> Result<Self> {
        let credentials = load_credentials(config)?;
        Ok(Self::build(config, &credentials))
    }

    pub fn build(config: &Config, credentials: &Credentials) -> Self {
        Self {
            schedules: ScheduleClient::new(
                config.schedule_base(),
                credentials.movie_api_key.clone(),
            ),
            booking: BookingClient::new(BookingClientConfig {
                ticketing_base: config.ticketing_base(),
                email_base: config.email_base(),
                ticketing_token: credentials.ticketing_auth_token.clone(),
                email_token: credentials.email_auth_token.clone(),
                customer_id: config.customer_id(),
                customer_email: config.customer_email(),
            }),
            locations: config.locations(),
        }
    }
}

/// Resolve the default data directory for Movie Maestro.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("movie-maestro"))
}

/// Data directory from config overrides, else the platform default.
pub fn resolve_data_dir(config: &Config) -> Result<PathBuf> {
    match &config.data_dir {
        Some(root) => Ok(root.clone()),
        None => default_data_dir(),
    }
}

pub fn store_from_config(config: &Config) -> Result<ConfigStore<KeyFileProvider>> {
    let root = resolve_data_dir(config)?;
    debug!(?root, "initializing credential store");
    Ok(ConfigStore::in_dir(root))
}

pub fn load_credentials(config: &Config) -> Result<Credentials> {
    let store = store_from_config(config)?;
    let (_key, credentials) = store.load_or_init()?;
    if credentials.has_placeholders() {
        warn!("credentials still hold placeholder values; run `maestro config init` and `maestro config seal`");
    }
    Ok(credentials)
}
