//! Authentication for ARTarget.
//!
//! The identity provider is external; the app only needs login, register,
//! logout, the current user, and a way to observe session changes. Those
//! sit behind [`SessionProvider`].

pub mod credentials;
pub mod error;
pub mod memory;
pub mod provider;

pub use credentials::{validate_email, validate_password, AuthMode, Credentials, MIN_PASSWORD_LEN};
pub use error::{AuthError, AuthResult};
pub use memory::InMemorySessionProvider;
pub use provider::{SessionProvider, User};
