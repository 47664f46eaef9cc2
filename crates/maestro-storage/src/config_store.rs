use std::{
    fs, io,
    path::{Path, PathBuf},
};

use maestro_core::credentials::Credentials;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    crypto::{self, CryptoError, EncryptionKey},
    files,
    key_provider::{KeyError, KeyFileProvider, KeyProvider},
};

pub const KEY_FILE: &str = "key.key";
pub const ENCRYPTED_CONFIG_FILE: &str = "encrypted_config.json";
pub const PLAINTEXT_CONFIG_FILE: &str = "config.json";

/// Failure to bring up the credentials at startup. Callers must not continue
/// with partial state.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("config file {} is not valid JSON credentials: {source}", path.display())]
    Plaintext {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Encrypted credentials file plus the provider of the key that seals it.
pub struct ConfigStore<P: KeyProvider> {
    config_path: PathBuf,
    key_provider: P,
}

impl ConfigStore<KeyFileProvider> {
    /// Store with explicit key and encrypted config locations.
    pub fn at(key_path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self::new(config_path, KeyFileProvider::new(key_path))
    }

    /// Store using the conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::at(dir.join(KEY_FILE), dir.join(ENCRYPTED_CONFIG_FILE))
    }
}

impl<P: KeyProvider> ConfigStore<P> {
    pub fn new(config_path: impl Into<PathBuf>, key_provider: P) -> Self {
        Self {
            config_path: config_path.into(),
            key_provider,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the key and credentials, creating either one when missing.
    ///
    /// A missing key file yields a fresh key; a missing encrypted config yields
    /// default placeholder credentials sealed under that key. An existing
    /// config that does not decrypt under the key is an error.
    #[instrument(skip_all, fields(path = %self.config_path.display()))]
    pub fn load_or_init(&self) -> Result<(EncryptionKey, Credentials), ConfigStoreError> {
        let key = self.key_provider.get_or_create()?;

        match fs::read(&self.config_path) {
            Ok(bytes) => {
                let credentials = crypto::decrypt(&bytes, &key)?;
                Ok((key, credentials))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let credentials = Credentials::default();
                self.save(&key, &credentials)?;
                info!("created encrypted config with placeholder credentials");
                Ok((key, credentials))
            }
            Err(source) => Err(ConfigStoreError::Read {
                path: self.config_path.clone(),
                source,
            }),
        }
    }

    /// Encrypts and atomically replaces the credentials file.
    pub fn save(
        &self,
        key: &EncryptionKey,
        credentials: &Credentials,
    ) -> Result<(), ConfigStoreError> {
        let token = crypto::encrypt(credentials, key)?;
        files::write_private(&self.config_path, &token).map_err(|source| {
            ConfigStoreError::Write {
                path: self.config_path.clone(),
                source,
            }
        })
    }

    /// Reads a plaintext credentials file and stores it encrypted under the
    /// current key. The plaintext file is left in place.
    #[instrument(skip_all, fields(from = %plaintext_path.as_ref().display()))]
    pub fn seal_plaintext(
        &self,
        plaintext_path: impl AsRef<Path>,
    ) -> Result<Credentials, ConfigStoreError> {
        let credentials = load_plaintext(plaintext_path)?;
        let key = self.key_provider.get_or_create()?;
        self.save(&key, &credentials)?;
        info!("sealed plaintext credentials");
        Ok(credentials)
    }
}

/// Writes the default credentials as pretty JSON unless the file exists.
/// Returns whether a file was written.
pub fn write_plaintext_default(path: impl AsRef<Path>) -> Result<bool, ConfigStoreError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    let body = serde_json::to_string_pretty(&Credentials::default()).map_err(|source| {
        ConfigStoreError::Plaintext {
            path: path.to_path_buf(),
            source,
        }
    })?;
    files::write_private(path, body.as_bytes()).map_err(|source| ConfigStoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

pub fn load_plaintext(path: impl AsRef<Path>) -> Result<Credentials, ConfigStoreError> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|source| ConfigStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&contents).map_err(|source| ConfigStoreError::Plaintext {
        path: path.to_path_buf(),
        source,
    })
}
