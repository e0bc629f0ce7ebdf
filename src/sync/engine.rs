//! Sync session engine
//!
//! A session is established from a sync code: the remote document wins on
//! connect (last writer wins), the journal subscribes to further updates,
//! and every local mutation is pushed in the background. A push that
//! fails marks the session inactive rather than failing the mutation that
//! triggered it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::journal::Journal;

use super::adapter::{RemoteStore, SyncError};
use super::merge::SyncPayload;

/// A live sync session held by the journal
pub struct SyncHandle {
    code: String,
    remote: Arc<dyn RemoteStore>,
    active: Arc<AtomicBool>,
    listener: JoinHandle<()>,
}

/// Reportable session state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub connected: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl SyncHandle {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Push a payload to the remote without blocking the caller. Failure
    /// deactivates the session; the local mutation already succeeded.
    pub fn push(&self, payload: SyncPayload) {
        if !self.is_active() {
            return;
        }
        let remote = Arc::clone(&self.remote);
        let active = Arc::clone(&self.active);
        let code = self.code.clone();
        tokio::spawn(async move {
            if let Err(e) = remote.merge_write(&code, payload).await {
                warn!(code = %code, "Sync push failed, deactivating session: {}", e);
                active.store(false, Ordering::SeqCst);
            }
        });
    }

    /// End the session: stop the inbound listener and stop pushing
    pub fn disconnect(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.listener.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Establish a sync session.
///
/// When the remote already holds a document for the code it replaces the
/// local journal; otherwise the local journal seeds the remote. Must not
/// be called while holding the journal lock.
pub async fn connect(
    journal: &Arc<Mutex<Journal>>,
    remote: Arc<dyn RemoteStore>,
    code: &str,
) -> Result<SyncHandle, SyncError> {
    match remote.fetch(code).await? {
        Some(payload) => {
            let mut guard = journal.lock().await;
            if let Err(e) = guard.apply_remote(payload) {
                warn!(code = %code, "Failed to persist remote document on connect: {}", e);
            }
            info!(code = %code, "Joined existing sync session");
        }
        None => {
            let payload = journal.lock().await.full_payload();
            remote.merge_write(code, payload).await?;
            info!(code = %code, "Seeded new sync session");
        }
    }

    let mut rx = remote.subscribe(code).await?;
    let active = Arc::new(AtomicBool::new(true));

    let listener = {
        let journal = Arc::clone(journal);
        let active = Arc::clone(&active);
        let code = code.to_string();
        tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                if !active.load(Ordering::SeqCst) {
                    break;
                }
                let mut guard = journal.lock().await;
                if let Err(e) = guard.apply_remote(payload) {
                    warn!(code = %code, "Failed to apply remote update: {}", e);
                }
            }
        })
    };

    Ok(SyncHandle {
        code: code.to_string(),
        remote,
        active,
        listener,
    })
}
