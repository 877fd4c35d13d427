use std::sync::Arc;

use art_auth::{AuthMode, AuthResult, Credentials, SessionProvider, User};
use art_registry::{TargetRepository, UpsertOutcome};
use art_store::ObjectStoreClient;
use art_sync::{SyncOrchestrator, SyncOutcome};
use art_types::{ArTarget, ContentType, ImageUploadResult, UploadFile};
use art_upload::{target_for_upload, UploadOrchestrator};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ConfigurationError};
use crate::launch::ArLaunch;

/// How the startup sync went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupSync {
    Synced { count: usize },
    /// The bucket was empty; the local registry was kept.
    SkippedEmptyRemote,
    /// The sync failed; the local registry was kept and `notice` should be
    /// shown to the user.
    Failed { notice: String },
}

/// Result of [`ArApp::start`].
#[derive(Clone, Debug)]
pub struct StartupReport {
    pub sync: StartupSync,
    /// Registry contents after the sync attempt.
    pub targets: Vec<ArTarget>,
}

/// A completed upload and the registry entry it produced.
#[derive(Clone, Debug)]
pub struct Registration {
    pub upload: ImageUploadResult,
    pub target: ArTarget,
    pub outcome: UpsertOutcome,
}

/// High-level ARTarget API.
pub struct ArApp {
    config: AppConfig,
    registry: Arc<dyn TargetRepository>,
    session: Arc<dyn SessionProvider>,
    uploader: UploadOrchestrator,
    syncer: SyncOrchestrator,
}

impl ArApp {
    /// Wire an app from its collaborators. Fails if `config` is unusable.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ObjectStoreClient>,
        registry: Arc<dyn TargetRepository>,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let uploader =
            UploadOrchestrator::new(Arc::clone(&store), config.upload_limits(), config.signed_url_expiry_secs);
        let syncer = SyncOrchestrator::new(store, Arc::clone(&registry), config.sync_options());
        Ok(Self {
            config,
            registry,
            session,
            uploader,
            syncer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    /// Refresh the registry from the bucket, degrading to the cached
    /// registry on failure.
    pub async fn start(&self) -> StartupReport {
        let sync = match self.syncer.sync().await {
            Ok(SyncOutcome::Replaced { count }) => StartupSync::Synced { count },
            Ok(SyncOutcome::SkippedEmptyRemote) => StartupSync::SkippedEmptyRemote,
            Err(e) => {
                warn!(error = %e, "startup sync failed, keeping cached registry");
                StartupSync::Failed {
                    notice: AppError::from(e).user_notice(),
                }
            }
        };
        let targets = self.registry.load();
        info!(?sync, targets = targets.len(), "startup complete");
        StartupReport { sync, targets }
    }

    /// Run a sync and surface its error instead of degrading.
    pub async fn sync(&self) -> AppResult<SyncOutcome> {
        Ok(self.syncer.sync().await?)
    }

    /// Upload `file` for barcode `marker_code` and bind it in the registry.
    ///
    /// The registry is untouched if validation or the upload fails.
    pub async fn upload_and_register(&self, file: &UploadFile, marker_code: u32) -> AppResult<Registration> {
        let upload = self.uploader.upload(file, marker_code).await?;
        let target = target_for_upload(marker_code, &upload);
        let outcome = self.registry.upsert(target.clone())?;
        info!(marker_code, path = %upload.path, ?outcome, "marker registered");
        Ok(Registration {
            upload,
            target,
            outcome,
        })
    }

    pub fn targets(&self) -> Vec<ArTarget> {
        self.registry.load()
    }

    pub fn launch(&self, content_type: ContentType) -> ArLaunch {
        ArLaunch::new(self.config.launch_page.clone(), content_type)
    }

    pub fn launch_hint(&self, hint: &str) -> ArLaunch {
        ArLaunch::from_hint(self.config.launch_page.clone(), hint)
    }

    /// Submit the sign-in form in `mode`.
    pub async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> AuthResult<User> {
        match mode {
            AuthMode::Login => self.session.login(credentials).await,
            AuthMode::Register => self.session.register(credentials).await,
        }
    }

    pub async fn logout(&self) -> AuthResult<()> {
        self.session.logout().await
    }
}

impl std::fmt::Debug for ArApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArApp")
            .field("bucket", &self.config.bucket)
            .field("registry_key", &self.config.registry_key)
            .finish_non_exhaustive()
    }
}
