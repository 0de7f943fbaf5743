//! Demo authentication store.
//!
//! Any non-empty email/password pair signs in. There is no credential check
//! and passwords are neither stored nor logged, so this is not a security
//! boundary; it only gives the checkout flow a signed-in shopper. A real
//! identity provider replaces [`AuthStore`] wholesale.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use cybrd_core::UserToken;

use super::ChangeNotifier;
use crate::storage::Persistence;

/// Storage key for the signed-in user.
pub const AUTH_KEY: &str = "cbrd.auth.v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Enter email and password")]
    MissingCredentials,
}

/// A signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserToken,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "Utc::now")]
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
}

#[derive(Debug)]
pub struct AuthStore {
    state: AuthState,
    persistence: Persistence,
    changes: ChangeNotifier,
}

impl AuthStore {
    /// Restore the persisted session, if any.
    #[must_use]
    pub fn hydrate(persistence: Persistence) -> Self {
        let user = persistence.load::<User>(AUTH_KEY);
        Self {
            state: AuthState { user },
            persistence,
            changes: ChangeNotifier::new(),
        }
    }

    /// Sign in with any non-empty email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if the trimmed email or the
    /// password is empty.
    pub fn login(&mut self, email: &str, password: &SecretString) -> Result<&User, AuthError> {
        self.sign_in(email, password, None)
    }

    /// Create an account. Same policy as [`login`](Self::login); a blank
    /// display name is dropped.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if the trimmed email or the
    /// password is empty.
    pub fn signup(
        &mut self,
        email: &str,
        password: &SecretString,
        name: Option<&str>,
    ) -> Result<&User, AuthError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        self.sign_in(email, password, name)
    }

    fn sign_in(
        &mut self,
        email: &str,
        password: &SecretString,
        name: Option<&str>,
    ) -> Result<&User, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = User {
            id: UserToken::generate(),
            email: email.to_string(),
            name: name.map(str::to_string),
            signed_in_at: Utc::now(),
        };
        tracing::info!(user_id = %user.id, "shopper signed in");

        self.persistence.save(AUTH_KEY, &user);
        self.changes.notify();
        Ok(self.state.user.insert(user))
    }

    /// End the session.
    pub fn logout(&mut self) {
        if let Some(user) = self.state.user.take() {
            tracing::info!(user_id = %user.id, "shopper signed out");
            self.persistence.remove(AUTH_KEY);
            self.changes.notify();
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut auth = AuthStore::hydrate(Persistence::in_memory());
        assert_eq!(
            auth.login("", &secret("pw")).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert_eq!(
            auth.login("   ", &secret("pw")).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert_eq!(
            auth.login("a@b.c", &secret("")).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert!(auth.user().is_none());
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Enter email and password"
        );
    }

    #[test]
    fn test_login_sets_fresh_user() {
        let mut auth = AuthStore::hydrate(Persistence::in_memory());
        let first = auth.login(" shopper@cybrd.store ", &secret("x")).unwrap().clone();
        assert_eq!(first.email, "shopper@cybrd.store");
        assert_eq!(first.name, None);

        let second = auth.login("shopper@cybrd.store", &secret("x")).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_signup_drops_blank_name() {
        let mut auth = AuthStore::hydrate(Persistence::in_memory());
        let user = auth.signup("a@b.c", &secret("pw"), Some("  ")).unwrap();
        assert_eq!(user.name, None);
        let user = auth.signup("a@b.c", &secret("pw"), Some(" Nour ")).unwrap();
        assert_eq!(user.name.as_deref(), Some("Nour"));
    }

    #[test]
    fn test_session_survives_reload_and_logout_removes_it() {
        let storage = Arc::new(MemoryStorage::new());
        let mut auth = AuthStore::hydrate(Persistence::new(storage.clone()));
        let id = auth.login("a@b.c", &secret("pw")).unwrap().id;

        let raw = storage.get_item(AUTH_KEY).unwrap().unwrap();
        assert!(!raw.contains("pw"));

        let mut reloaded = AuthStore::hydrate(Persistence::new(storage.clone()));
        assert_eq!(reloaded.user().map(|u| u.id), Some(id));

        reloaded.logout();
        assert!(reloaded.user().is_none());
        assert_eq!(storage.get_item(AUTH_KEY).unwrap(), None);
    }

    #[test]
    fn test_hydrates_legacy_value_without_timestamp() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                AUTH_KEY,
                r#"{"id":"7f8c3a52-2a0e-4b8e-9a53-0c1d0f4f6b11","email":"old@cybrd.store"}"#,
            )
            .unwrap();
        let auth = AuthStore::hydrate(Persistence::new(storage));
        assert_eq!(auth.user().unwrap().email, "old@cybrd.store");
    }
}
