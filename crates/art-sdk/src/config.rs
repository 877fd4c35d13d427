use std::path::Path;
use std::time::Duration;

use art_registry::DEFAULT_REGISTRY_KEY;
use art_store::MAX_SIGNED_URL_EXPIRY_SECS;
use art_sync::SyncOptions;
use art_upload::{UploadLimits, DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_SIGNED_URL_EXPIRY_SECS};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::launch::DEFAULT_LAUNCH_PAGE;

const PLACEHOLDER_URL: &str = "YOUR_STORE_URL_HERE";
const PLACEHOLDER_KEY: &str = "YOUR_STORE_KEY_HERE";
const ENV_PREFIX: &str = "ARTARGET_";

/// Application settings.
///
/// Read from a TOML file and/or `ARTARGET_*` environment variables, the
/// environment winning. Every field has a default except the store
/// credentials, which [`validate`](Self::validate) insists on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_url: String,
    pub store_key: String,
    pub bucket: String,
    pub signed_url_expiry_secs: u64,
    pub max_file_size_mb: u64,
    pub allowed_mime_types: Vec<String>,
    pub registry_key: String,
    pub list_limit: usize,
    pub sync_timeout_secs: Option<u64>,
    pub launch_page: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: PLACEHOLDER_URL.into(),
            store_key: PLACEHOLDER_KEY.into(),
            bucket: "targetsimages".into(),
            signed_url_expiry_secs: DEFAULT_SIGNED_URL_EXPIRY_SECS,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            registry_key: DEFAULT_REGISTRY_KEY.into(),
            list_limit: 100,
            sync_timeout_secs: None,
            launch_page: DEFAULT_LAUNCH_PAGE.into(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(s)?)
    }

    /// Defaults, overlaid with `path` if given, overlaid with the process
    /// environment, then validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `ARTARGET_*` variables resolved through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(v) = var("STORE_URL") {
            self.store_url = v;
        }
        if let Some(v) = var("STORE_KEY") {
            self.store_key = v;
        }
        if let Some(v) = var("BUCKET") {
            self.bucket = v;
        }
        if let Some(v) = var("REGISTRY_KEY") {
            self.registry_key = v;
        }
        if let Some(v) = var("SYNC_TIMEOUT_SECS") {
            let secs = v.parse().map_err(|_| ConfigurationError::Invalid {
                field: "sync_timeout_secs",
                reason: format!("not a number: {v:?}"),
            })?;
            self.sync_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_credential("store_url", &self.store_url, PLACEHOLDER_URL)?;
        check_credential("store_key", &self.store_key, PLACEHOLDER_KEY)?;

        if self.bucket.trim().is_empty() {
            return Err(ConfigurationError::Missing("bucket"));
        }
        if self.registry_key.trim().is_empty() {
            return Err(ConfigurationError::Missing("registry_key"));
        }
        let nonzero = [
            ("signed_url_expiry_secs", self.signed_url_expiry_secs),
            ("max_file_size_mb", self.max_file_size_mb),
            ("list_limit", self.list_limit as u64),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(ConfigurationError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if self.signed_url_expiry_secs > MAX_SIGNED_URL_EXPIRY_SECS {
            return Err(ConfigurationError::Invalid {
                field: "signed_url_expiry_secs",
                reason: format!("at most {MAX_SIGNED_URL_EXPIRY_SECS} seconds"),
            });
        }
        if self.allowed_mime_types.is_empty() {
            return Err(ConfigurationError::Invalid {
                field: "allowed_mime_types",
                reason: "at least one type must be allowed".into(),
            });
        }
        if self.sync_timeout_secs == Some(0) {
            return Err(ConfigurationError::Invalid {
                field: "sync_timeout_secs",
                reason: "must be greater than zero when set".into(),
            });
        }
        Ok(())
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size_mb: self.max_file_size_mb,
            allowed_mime_types: self.allowed_mime_types.clone(),
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            prefix: String::new(),
            list_limit: self.list_limit,
            signed_url_expiry_secs: self.signed_url_expiry_secs,
            timeout: self.sync_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn check_credential(field: &'static str, value: &str, placeholder: &str) -> Result<(), ConfigurationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigurationError::Missing(field));
    }
    if value == placeholder {
        return Err(ConfigurationError::Placeholder(field));
    }
    Ok(())
}
