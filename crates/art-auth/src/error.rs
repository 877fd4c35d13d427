use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The form input is malformed; nothing was sent to the provider.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("email already in use: {0}")]
    EmailInUse(String),

    #[error("wrong email or password")]
    InvalidLogin,

    #[error("identity provider error: {0}")]
    Provider(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
