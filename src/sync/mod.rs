pub mod remote;

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::SolomonConfig;
use crate::core::state::AppState;
use crate::store::LocalStore;
pub use remote::RemoteClient;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Current sync status shown next to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Error(String),
    LastSynced(String), // formatted timestamp
}

/// Local store plus an optional remote copy.
///
/// Local writes always happen first. The remote copy is best effort: saves
/// are pushed in the background and failures are only logged, so the next
/// save is the retry.
#[derive(Debug, Clone)]
pub struct Mirror {
    local: LocalStore,
    remote: Option<Arc<RemoteClient>>,
}

impl Mirror {
    pub fn new(local: LocalStore, remote: Option<RemoteClient>) -> Self {
        Self {
            local,
            remote: remote.map(Arc::new),
        }
    }

    pub fn from_config(config: &SolomonConfig) -> Self {
        let local = LocalStore::new(config.state_path());
        let remote = config.remote_url().and_then(|url| {
            match RemoteClient::new(url, config.request_timeout()) {
                Ok(client) => Some(client),
                Err(e) => {
                    log::warn!("Remote mirror disabled: {}", e);
                    None
                }
            }
        });
        Self::new(local, remote)
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> Option<&RemoteClient> {
        self.remote.as_deref()
    }

    /// Write locally, then push to the remote in the background.
    ///
    /// Returns the push task when one was started. Without a tokio runtime
    /// the remote push is skipped.
    pub fn save(&self, state: &AppState) -> Option<JoinHandle<()>> {
        self.local.persist(state);

        let remote = self.remote.clone()?;
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::debug!("No async runtime, remote save skipped");
                return None;
            }
        };
        let snapshot = state.clone();
        Some(runtime.spawn(async move {
            if let Err(e) = remote.push_state(&snapshot).await {
                log::warn!("Remote save failed, keeping local copy: {}", e);
            }
        }))
    }

    /// Fetch the remote document once. `Ok(None)` when no remote is configured.
    pub async fn fetch(&self, today: NaiveDate) -> Result<Option<AppState>, SyncError> {
        match &self.remote {
            Some(remote) => remote.fetch_state(today).await.map(Some),
            None => Ok(None),
        }
    }
}
