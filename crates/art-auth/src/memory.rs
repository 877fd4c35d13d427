//! In-memory identity provider for tests and offline use.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::provider::{SessionProvider, User};

struct Account {
    user: User,
    salt: [u8; 16],
    password_hash: blake3::Hash,
}

fn hash_password(salt: &[u8; 16], password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize()
}

/// A [`SessionProvider`] keeping accounts in a `HashMap`.
///
/// Accounts are keyed by normalized email and lost when the provider is
/// dropped. Passwords are stored as salted BLAKE3 digests.
pub struct InMemorySessionProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: watch::Sender<Option<User>>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session,
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for InMemorySessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn login(&self, credentials: &Credentials) -> AuthResult<User> {
        credentials.validate()?;
        let email = credentials.normalized_email();
        let user = {
            let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
            let account = accounts.get(&email).ok_or(AuthError::InvalidLogin)?;
            if hash_password(&account.salt, &credentials.password) != account.password_hash {
                return Err(AuthError::InvalidLogin);
            }
            account.user.clone()
        };
        self.session.send_replace(Some(user.clone()));
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    async fn register(&self, credentials: &Credentials) -> AuthResult<User> {
        credentials.validate()?;
        let email = credentials.normalized_email();
        let user = {
            let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailInUse(email));
            }
            let mut salt = [0u8; 16];
            rand::Rng::fill(&mut rand::thread_rng(), &mut salt);
            let user = User {
                id: Uuid::now_v7(),
                email: email.clone(),
                created_at: Utc::now(),
            };
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    salt,
                    password_hash: hash_password(&salt, &credentials.password),
                },
            );
            user
        };
        self.session.send_replace(Some(user.clone()));
        info!(user = %user.id, "registered");
        Ok(user)
    }

    async fn logout(&self) -> AuthResult<()> {
        if let Some(user) = self.session.send_replace(None) {
            debug!(user = %user.id, "signed out");
        }
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("ada@example.com", "engine42")
    }

    #[tokio::test]
    async fn register_signs_in() {
        let auth = InMemorySessionProvider::new();
        assert!(auth.current_user().is_none());
        let user = auth.register(&creds()).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(auth.current_user(), Some(user));
        assert_eq!(auth.account_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_register_rejected() {
        let auth = InMemorySessionProvider::new();
        auth.register(&creds()).await.unwrap();
        let err = auth
            .register(&Credentials::new("ADA@example.com", "different1"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailInUse("ada@example.com".into()));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let auth = InMemorySessionProvider::new();
        let registered = auth.register(&creds()).await.unwrap();
        auth.logout().await.unwrap();

        let err = auth
            .login(&Credentials::new("ada@example.com", "wrongpass"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidLogin);
        assert!(auth.current_user().is_none());

        let user = auth.login(&creds()).await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn unknown_user_cannot_login() {
        let auth = InMemorySessionProvider::new();
        assert_eq!(auth.login(&creds()).await.unwrap_err(), AuthError::InvalidLogin);
    }

    #[tokio::test]
    async fn malformed_input_rejected_before_lookup() {
        let auth = InMemorySessionProvider::new();
        let err = auth.register(&Credentials::new("nope", "engine42")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        let err = auth.register(&Credentials::new("a@b.io", "123")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(auth.account_count(), 0);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let auth = InMemorySessionProvider::new();
        auth.logout().await.unwrap();
        auth.register(&creds()).await.unwrap();
        auth.logout().await.unwrap();
        auth.logout().await.unwrap();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_session_changes() {
        let auth = InMemorySessionProvider::new();
        let mut rx = auth.subscribe();
        assert!(rx.borrow().is_none());

        auth.register(&creds()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.email.clone()), Some("ada@example.com".into()));

        auth.logout().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
