//! Session token cache in the OS keyring.
//!
//! Entries are keyed by auth URL, user and tenant.

use keyring::Entry;
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::Session;

const KEYRING_SERVICE: &str = "oscli";

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("keyring error: {0}")]
    KeyringAccessError(#[from] keyring::Error),
    #[error("cannot serialize session: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct Keyring {}

impl Keyring {
    /// Keyring account name for a cached session.
    pub fn session_key(auth_url: &str, username: Option<&str>, tenant: Option<&str>) -> String {
        [auth_url, username.unwrap_or_default(), tenant.unwrap_or_default()].join("|")
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, KeyringError> {
        let entry = Entry::new(KEYRING_SERVICE, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(KeyringError::from(e)),
        }
    }

    pub fn put(&self, key: &str, value: &str) -> Result<(), KeyringError> {
        let entry = Entry::new(KEYRING_SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    /// Remove an entry; a missing entry is not an error.
    pub fn delete(&self, key: &str) -> Result<(), KeyringError> {
        let entry = Entry::new(KEYRING_SERVICE, key)?;
        match entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeyringError::from(e)),
        }
    }

    /// A cached session, if one exists and can still be decoded.
    pub fn load_session(&self, key: &str) -> Result<Option<Session>, KeyringError> {
        let value = match self.get(key)? {
            Some(value) => value,
            None => return Ok(None),
        };
        match serde_json::from_str::<Session>(&value) {
            Ok(session) => {
                debug!("Found cached session");
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Ignoring unreadable cached session: {}", e);
                Ok(None)
            }
        }
    }

    pub fn store_session(&self, key: &str, session: &Session) -> Result<(), KeyringError> {
        let value = serde_json::to_string(session)?;
        self.put(key, &value)
    }
}
