use std::path::PathBuf;

use thiserror::Error;

/// Missing or unusable settings. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{0} is not configured")]
    Missing(&'static str),

    #[error("{0} still holds the placeholder value")]
    Placeholder(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Upload(#[from] art_upload::UploadError),

    #[error("registry error: {0}")]
    Registry(#[from] art_registry::RegistryError),

    #[error("sync error: {0}")]
    Sync(#[from] art_sync::SyncError),

    #[error("authentication error: {0}")]
    Auth(#[from] art_auth::AuthError),
}

impl AppError {
    /// Message suitable for showing to the user as-is.
    pub fn user_notice(&self) -> String {
        match self {
            Self::Upload(e) => e.to_string(),
            Self::Auth(e) => e.to_string(),
            Self::Registry(_) => "Could not save the marker list on this device.".into(),
            Self::Sync(_) => "Could not refresh markers; showing the last saved list.".into(),
            Self::Configuration(e) => format!("The app is misconfigured: {e}"),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
