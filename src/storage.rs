//! Bearer credential storage.
//!
//! Two pieces: the in-memory [`TokenCell`] that outgoing requests read at
//! build time, and the durable [`TokenStore`] that lets a login survive a
//! terminal restart. The durable default uses the OS credential store via
//! the `keyring` crate (DPAPI on Windows, Keychain on macOS, Secret
//! Service / keyutils on Linux). Cleared token buffers are wiped with
//! `zeroize`.

use std::sync::{Mutex, RwLock};

use keyring::Entry;
use tracing::warn;
use zeroize::Zeroize;

use crate::error::PosError;

const SERVICE_NAME: &str = "kasir-pos";
const ACCESS_TOKEN_KEY: &str = "access_token";

// ---------------------------------------------------------------------------
// In-memory credential
// ---------------------------------------------------------------------------

/// Shared holder for the current bearer token.
///
/// The session service is the only mutator; the API client reads the cell
/// when it builds each request, so a logout can never leave a stale token
/// captured in a closure.
#[derive(Default)]
pub struct TokenCell {
    token: RwLock<Option<String>>,
}

impl TokenCell {
    pub fn set(&self, token: &str) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        if let Some(mut old) = guard.take() {
            old.zeroize();
        }
        *guard = Some(token.to_string());
    }

    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        if let Some(mut old) = guard.take() {
            old.zeroize();
        }
    }

    /// Snapshot of the current token, taken at request-build time.
    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

// ---------------------------------------------------------------------------
// Durable storage
// ---------------------------------------------------------------------------

/// Durable persistence for the bearer token, restored at startup.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when nothing is stored.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<(), PosError>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<(), PosError>;
}

/// OS-keyring-backed store.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, PosError> {
        Entry::new(SERVICE_NAME, ACCESS_TOKEN_KEY).map_err(|e| PosError::Storage(e.to_string()))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<String> {
        let entry = match Self::entry() {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "keyring: failed to create entry");
                return None;
            }
        };
        match entry.get_password() {
            Ok(pw) => Some(pw),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "keyring: failed to read credential");
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), PosError> {
        Self::entry()?
            .set_password(token)
            .map_err(|e| PosError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), PosError> {
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(PosError::Storage(e.to_string())),
        }
    }
}

/// In-memory store for tests and ephemeral terminals with no OS keyring.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a stored token (simulates a previous login).
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, token: &str) -> Result<(), PosError> {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut old) = guard.take() {
            old.zeroize();
        }
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PosError> {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(mut old) = guard.take() {
            old.zeroize();
        }
        Ok(())
    }
}
