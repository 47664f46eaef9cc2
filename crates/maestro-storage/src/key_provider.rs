use std::{
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    crypto::{self, CryptoError, EncryptionKey},
    files,
};

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("key file {} is invalid: {source}", path.display())]
    Decode { path: PathBuf, source: CryptoError },
    #[error("generation error: {0}")]
    Generation(String),
}

/// Provides the encryption key (key file in production; memory in tests).
pub trait KeyProvider: Send + Sync {
    /// Returns the existing key, creating and persisting one on first use.
    fn get_or_create(&self) -> Result<EncryptionKey, KeyError>;
}

/// Key kept as base64 text in a file next to the encrypted config.
#[derive(Debug, Clone)]
pub struct KeyFileProvider {
    path: PathBuf,
}

impl KeyFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl KeyProvider for KeyFileProvider {
    fn get_or_create(&self) -> Result<EncryptionKey, KeyError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!(path = %self.path.display(), "loaded encryption key");
                EncryptionKey::decode(&text).map_err(|source| KeyError::Decode {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let key = crypto::generate_key();
                files::write_private(&self.path, key.encode().as_bytes()).map_err(|source| {
                    KeyError::Io {
                        path: self.path.clone(),
                        source,
                    }
                })?;
                info!(path = %self.path.display(), "generated new encryption key");
                Ok(key)
            }
            Err(source) => Err(KeyError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-memory key provider for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyProvider {
    inner: Arc<Mutex<Option<EncryptionKey>>>,
}

impl KeyProvider for InMemoryKeyProvider {
    fn get_or_create(&self) -> Result<EncryptionKey, KeyError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|err| KeyError::Generation(format!("lock poisoned: {err}")))?;

        if let Some(existing) = guard.clone() {
            return Ok(existing);
        }

        let key = crypto::generate_key();
        *guard = Some(key.clone());
        Ok(key)
    }
}
