use std::fmt;

use crate::error::{AuthError, AuthResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Email and password as typed into the sign-in form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check both fields before any provider round-trip.
    pub fn validate(&self) -> AuthResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }

    /// Trimmed, lower-cased email used as the account key.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Accept `local@domain.tld`-shaped addresses.
pub fn validate_email(email: &str) -> AuthResult<()> {
    let email = email.trim();
    let invalid = |reason: &str| Err(AuthError::InvalidCredentials(reason.to_string()));

    if email.is_empty() {
        return invalid("email is required");
    }
    if email.chars().any(char::is_whitespace) {
        return invalid("email must not contain whitespace");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return invalid("email must contain '@'");
    };
    if local.is_empty() || domain.contains('@') {
        return invalid("email must have exactly one '@' after a non-empty name");
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return invalid("email domain must look like example.com");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidCredentials(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Which action the sign-in form submits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    /// Heading shown above a failure message.
    pub fn failure_title(self) -> &'static str {
        match self {
            Self::Login => "Login Failed",
            Self::Register => "Registration Failed",
        }
    }
}
