use std::sync::Arc;
use std::time::Duration;

use art_registry::TargetRepository;
use art_store::{ListOptions, ObjectStoreClient};
use art_types::{ArContent, ArTarget};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};

/// Knobs for a registry sync.
#[derive(Clone, Debug)]
pub struct SyncOptions {
    /// Only objects whose name starts with this are synced.
    pub prefix: String,
    pub list_limit: usize,
    pub signed_url_expiry_secs: u64,
    /// Abandon the sync, keeping the stale registry, after this long.
    pub timeout: Option<Duration>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            list_limit: ListOptions::default().limit,
            signed_url_expiry_secs: 3600,
            timeout: None,
        }
    }
}

/// What a sync did to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The registry was overwritten with `count` barcode targets.
    Replaced { count: usize },
    /// The bucket listed nothing; the registry was left alone.
    SkippedEmptyRemote,
}

/// Rebuilds the local registry from the bucket listing.
///
/// Barcode values are positions in the creation-ordered listing, so
/// deleting or back-dating an object shifts the codes of every later one.
/// Targets that are not backed by a bucket object are dropped on overwrite.
pub struct SyncOrchestrator {
    store: Arc<dyn ObjectStoreClient>,
    registry: Arc<dyn TargetRepository>,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn ObjectStoreClient>,
        registry: Arc<dyn TargetRepository>,
        options: SyncOptions,
    ) -> Self {
        Self {
            store,
            registry,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one sync.
    ///
    /// Any failure leaves the persisted registry exactly as it was; the
    /// registry is only written once every target has been built.
    pub async fn sync(&self) -> SyncResult<SyncOutcome> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run())
                .await
                .map_err(|_| SyncError::TimedOut(limit))?,
            None => self.run().await,
        }
    }

    async fn run(&self) -> SyncResult<SyncOutcome> {
        let listing = self
            .store
            .list(&self.options.prefix, ListOptions::with_limit(self.options.list_limit))
            .await
            .map_err(SyncError::List)?;

        if listing.is_empty() {
            warn!("remote listing is empty, keeping local registry");
            return Ok(SyncOutcome::SkippedEmptyRemote);
        }

        let names: Vec<String> = listing.into_iter().map(|o| o.name).collect();
        let urls = self.sign_all(&names).await?;

        let targets: Vec<ArTarget> = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| ArTarget::barcode(i as u32, ArContent::image(url)))
            .collect();

        self.registry.replace_all(&targets)?;
        info!(count = targets.len(), "registry synced from remote");
        Ok(SyncOutcome::Replaced {
            count: targets.len(),
        })
    }

    /// Request signed URLs concurrently; results come back in `names` order.
    async fn sign_all(&self, names: &[String]) -> SyncResult<Vec<String>> {
        let mut tasks = JoinSet::new();
        for (index, name) in names.iter().enumerate() {
            let store = Arc::clone(&self.store);
            let name = name.clone();
            let expiry = self.options.signed_url_expiry_secs;
            tasks.spawn(async move {
                let result = store.create_signed_url(&name, expiry).await;
                (index, name, result)
            });
        }

        let mut urls: Vec<Option<String>> = vec![None; names.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, name, result) = joined.map_err(|e| SyncError::Task(e.to_string()))?;
            match result {
                Ok(url) => {
                    debug!(index, %name, "signed");
                    urls[index] = Some(url);
                }
                // Dropping `tasks` aborts the requests still in flight.
                Err(source) => return Err(SyncError::SignedUrl { name, source }),
            }
        }

        urls.into_iter()
            .zip(names)
            .map(|(url, name)| url.ok_or_else(|| SyncError::Task(format!("no signed URL for {name}"))))
            .collect()
    }
}
