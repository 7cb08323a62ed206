//! Cashier session lifecycle.
//!
//! An explicit, injectable service owning the authenticated user and the
//! bearer credential. Consumers receive it by reference; nothing here is
//! ambient global state. The credential lives in the shared [`TokenCell`]
//! (read by the API client at request-build time) and in the durable
//! [`TokenStore`] so a login survives a terminal restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::api::Backend;
use crate::error::PosError;
use crate::models::User;
use crate::storage::{TokenCell, TokenStore};

/// Shown when a login failure carries no usable backend detail.
const GENERIC_LOGIN_FAILURE: &str = "Login gagal. Periksa username dan password.";

pub struct SessionService {
    backend: Arc<dyn Backend>,
    tokens: Arc<TokenCell>,
    store: Box<dyn TokenStore>,
    user: RwLock<Option<User>>,
    /// True from construction until `restore` completes. Consumers must
    /// not route to login or dashboard while this is set, or the wrong
    /// screen flashes before the stored credential is resolved.
    loading: AtomicBool,
}

impl SessionService {
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<TokenCell>, store: Box<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            store,
            user: RwLock::new(None),
            loading: AtomicBool::new(true),
        }
    }

    /// Resolve a previously persisted credential at startup.
    ///
    /// When a stored token exists, the profile is fetched to validate it;
    /// any failure silently clears the credential and leaves the session
    /// unauthenticated. `loading` transitions false exactly once, after
    /// resolution completes.
    pub async fn restore(&self) {
        if let Some(token) = self.store.load() {
            self.tokens.set(&token);
            match self.backend.profile().await {
                Ok(user) => {
                    info!(cashier = %user.name, "session restored from stored credential");
                    self.set_user(Some(user));
                }
                Err(e) => {
                    info!(error = %e, "stored credential rejected, falling back to login");
                    self.discard_credential();
                }
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Authenticate against the backend. On success the credential is
    /// attached to all subsequent requests and persisted durably.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, PosError> {
        let resp = self
            .backend
            .login(username, password)
            .await
            .map_err(|e| match e {
                PosError::Auth(detail) | PosError::Api { detail, .. } if !detail.is_empty() => {
                    PosError::Auth(detail)
                }
                PosError::Network(msg) => PosError::Network(msg),
                _ => PosError::Auth(GENERIC_LOGIN_FAILURE.to_string()),
            })?;

        self.tokens.set(&resp.access_token);
        if let Err(e) = self.store.save(&resp.access_token) {
            // The session still works for this run; it just won't survive
            // a restart.
            warn!(error = %e, "failed to persist credential");
        }
        self.set_user(Some(resp.user.clone()));
        info!(cashier = %resp.user.name, role = %resp.user.role, "login successful");
        Ok(resp.user)
    }

    /// Clear the session unconditionally. No backend call is made; the
    /// credential is detached from future requests and removed from
    /// durable storage.
    pub fn logout(&self) {
        self.discard_credential();
        info!("session logged out");
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }

    fn discard_credential(&self) {
        self.tokens.clear();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored credential");
        }
        self.set_user(None);
    }
}
