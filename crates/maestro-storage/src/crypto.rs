use std::fmt;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use maestro_core::credentials::Credentials;
use rand::RngCore;
use thiserror::Error;

/// First byte of every token; bump when the layout changes.
const TOKEN_VERSION: u8 = 0x01;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encryption failed: {reason}")]
    Encryption { reason: String },
    /// Wrong key, tampered or truncated token, or undecodable payload.
    #[error("decryption failed: {reason}")]
    Decryption { reason: String },
}

/// 256-bit symmetric key. The same key must encrypt and decrypt a given file.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Text form stored in the key file.
    pub fn encode(&self) -> String {
        URL_SAFE.encode(self.0)
    }

    pub fn decode(text: &str) -> Result<Self, CryptoError> {
        let bytes = URL_SAFE
            .decode(text.trim())
            .map_err(|e| CryptoError::Decryption {
                reason: format!("key decode failed: {e}"),
            })?;
        let bytes: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|raw: Vec<u8>| CryptoError::Decryption {
                    reason: format!("expected {KEY_LEN} key bytes, got {}", raw.len()),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

/// Fresh random key from the OS RNG. The caller persists it.
pub fn generate_key() -> EncryptionKey {
    let mut bytes = [0u8; KEY_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    EncryptionKey(bytes)
}

/// Serializes the credentials to JSON and seals them into a text token:
/// base64url(`version || nonce || ciphertext+tag`).
pub fn encrypt(config: &Credentials, key: &EncryptionKey) -> Result<Vec<u8>, CryptoError> {
    let plaintext = serde_json::to_vec(config).map_err(|e| CryptoError::Encryption {
        reason: format!("serialize failed: {e}"),
    })?;

    let cipher = build_cipher(key).map_err(|reason| CryptoError::Encryption { reason })?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, plaintext.as_ref())
        .map_err(|e| CryptoError::Encryption {
            reason: format!("seal failed: {e}"),
        })?;

    let mut token = Vec::with_capacity(1 + NONCE_LEN + sealed.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(nonce.as_slice());
    token.extend_from_slice(&sealed);
    Ok(URL_SAFE_NO_PAD.encode(token).into_bytes())
}

/// Reverses [`encrypt`]. Surrounding whitespace in the token is ignored.
pub fn decrypt(ciphertext: &[u8], key: &EncryptionKey) -> Result<Credentials, CryptoError> {
    let text = std::str::from_utf8(ciphertext).map_err(decryption_err)?;
    let token = URL_SAFE_NO_PAD
        .decode(text.trim())
        .map_err(decryption_err)?;

    if token.len() < 1 + NONCE_LEN + TAG_LEN {
        return Err(CryptoError::Decryption {
            reason: format!("token too short ({} bytes)", token.len()),
        });
    }
    if token[0] != TOKEN_VERSION {
        return Err(CryptoError::Decryption {
            reason: format!("unsupported token version {:#04x}", token[0]),
        });
    }

    let nonce = Nonce::from_slice(&token[1..1 + NONCE_LEN]);
    let cipher = build_cipher(key).map_err(|reason| CryptoError::Decryption { reason })?;
    let plaintext = cipher
        .decrypt(nonce, &token[1 + NONCE_LEN..])
        .map_err(|_| CryptoError::Decryption {
            reason: "authentication failed (wrong key or tampered data)".to_string(),
        })?;

    serde_json::from_slice(&plaintext).map_err(decryption_err)
}

fn build_cipher(key: &EncryptionKey) -> Result<Aes256Gcm, String> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| format!("cipher init failed: {e}"))
}

fn decryption_err<E: ToString>(err: E) -> CryptoError {
    CryptoError::Decryption {
        reason: err.to_string(),
    }
}
