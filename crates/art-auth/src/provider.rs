use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::AuthResult;

/// A signed-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Identity provider seen from the app.
///
/// `login` and `register` both sign the user in on success; every change of
/// the signed-in user is published to [`subscribe`](Self::subscribe) receivers.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> AuthResult<User>;
    async fn register(&self, credentials: &Credentials) -> AuthResult<User>;
    /// Sign out. Signing out with no active session succeeds.
    async fn logout(&self) -> AuthResult<()>;
    fn current_user(&self) -> Option<User>;
    /// Receiver that always holds the current user and wakes on changes.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}
