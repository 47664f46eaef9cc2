//! Encrypted-at-rest storage for the credentials file.
//! Uses AES-256-GCM with a key kept in a local key file (or a test double).

pub mod config_store;
pub mod crypto;
mod files;
pub mod key_provider;
