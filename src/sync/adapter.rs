//! Remote store adapters
//!
//! The sync engine talks to a remote through the [`RemoteStore`] trait:
//! fetch the shared document, merge a payload into it, and subscribe to
//! updates made by other writers. Two adapters are provided, an in-memory
//! one for tests and a shared-directory one backed by polling.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::models::AppState;

use super::merge::{apply_payload, SyncPayload};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid sync code '{0}'")]
    InvalidCode(String),

    #[error("remote I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote document error: {0}")]
    Document(#[from] serde_json::Error),
}

/// A remote rendezvous for journals sharing a sync code.
///
/// `merge_write` is last-writer-wins per collection; subscribers receive
/// the full merged document after every write, including their own.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The current shared document, `None` when no writer has pushed yet
    async fn fetch(&self, code: &str) -> Result<Option<SyncPayload>, SyncError>;

    /// Merge a payload into the shared document and notify subscribers
    async fn merge_write(&self, code: &str, payload: SyncPayload) -> Result<(), SyncError>;

    /// Stream of merged documents produced by subsequent writes
    async fn subscribe(&self, code: &str) -> Result<mpsc::Receiver<SyncPayload>, SyncError>;
}

const SUBSCRIBER_BUFFER: usize = 16;

fn validate_code(code: &str) -> Result<(), SyncError> {
    let ok = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(SyncError::InvalidCode(code.to_string()))
    }
}

#[derive(Default)]
struct MemoryRemoteInner {
    docs: HashMap<String, AppState>,
    subscribers: HashMap<String, Vec<mpsc::Sender<SyncPayload>>>,
}

/// In-process remote for tests: all journals holding a clone share state
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryRemoteInner>>,
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch(&self, code: &str) -> Result<Option<SyncPayload>, SyncError> {
        validate_code(code)?;
        let inner = self.inner.lock().await;
        Ok(inner.docs.get(code).map(SyncPayload::full))
    }

    async fn merge_write(&self, code: &str, payload: SyncPayload) -> Result<(), SyncError> {
        validate_code(code)?;
        let mut inner = self.inner.lock().await;
        let doc = inner.docs.entry(code.to_string()).or_default();
        apply_payload(doc, payload);
        let merged = SyncPayload::full(doc);

        if let Some(senders) = inner.subscribers.get_mut(code) {
            // Drop subscribers whose receiver is gone
            let mut live = Vec::with_capacity(senders.len());
            for sender in senders.drain(..) {
                if sender.send(merged.clone()).await.is_ok() {
                    live.push(sender);
                }
            }
            *senders = live;
        }
        Ok(())
    }

    async fn subscribe(&self, code: &str) -> Result<mpsc::Receiver<SyncPayload>, SyncError> {
        validate_code(code)?;
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let mut inner = self.inner.lock().await;
        inner.subscribers.entry(code.to_string()).or_default().push(tx);
        Ok(rx)
    }
}

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Remote backed by a shared directory, one JSON document per sync code.
/// Updates from other writers are picked up by polling the file's
/// modification time.
pub struct FileRemote {
    dir: PathBuf,
    poll_interval: Duration,
}

impl FileRemote {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Shorter intervals keep tests fast
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn doc_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.json", code))
    }

    async fn read_doc(&self, code: &str) -> Result<Option<AppState>, SyncError> {
        match tokio::fs::read_to_string(self.doc_path(code)).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn modified(&self, code: &str) -> Option<SystemTime> {
        tokio::fs::metadata(self.doc_path(code))
            .await
            .ok()
            .and_then(|m| m.modified().ok())
    }
}

#[async_trait]
impl RemoteStore for FileRemote {
    async fn fetch(&self, code: &str) -> Result<Option<SyncPayload>, SyncError> {
        validate_code(code)?;
        Ok(self.read_doc(code).await?.map(|doc| SyncPayload::full(&doc)))
    }

    async fn merge_write(&self, code: &str, payload: SyncPayload) -> Result<(), SyncError> {
        validate_code(code)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut doc = self.read_doc(code).await?.unwrap_or_default();
        apply_payload(&mut doc, payload);
        let json = serde_json::to_string(&doc)?;

        // Write-then-rename so a concurrent reader never sees a torn file
        let tmp = self.dir.join(format!("{}.json.tmp", code));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, self.doc_path(code)).await?;
        Ok(())
    }

    async fn subscribe(&self, code: &str) -> Result<mpsc::Receiver<SyncPayload>, SyncError> {
        validate_code(code)?;
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);

        let remote = FileRemote {
            dir: self.dir.clone(),
            poll_interval: self.poll_interval,
        };
        let code = code.to_string();
        let mut last_seen = remote.modified(&code).await;

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(remote.poll_interval).await;
                let current = remote.modified(&code).await;
                if current == last_seen {
                    continue;
                }
                last_seen = current;

                match remote.read_doc(&code).await {
                    Ok(Some(doc)) => {
                        debug!(code = %code, "Shared document changed");
                        if tx.send(SyncPayload::full(&doc)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(code = %code, "Failed to read shared document: {}", e),
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::days::set_weight;
    use crate::weight::WeightUnit;

    fn sample_payload() -> SyncPayload {
        let mut state = AppState::default();
        set_weight(&mut state, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        SyncPayload::full(&state)
    }

    #[tokio::test]
    async fn test_memory_remote_fetch_after_write() {
        let remote = MemoryRemote::default();
        assert!(remote.fetch("abc").await.unwrap().is_none());

        remote.merge_write("abc", sample_payload()).await.unwrap();
        let doc = remote.fetch("abc").await.unwrap().unwrap();
        assert_eq!(doc.days.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_remote_notifies_subscribers() {
        let remote = MemoryRemote::default();
        let mut rx = remote.subscribe("abc").await.unwrap();

        remote.merge_write("abc", sample_payload()).await.unwrap();
        let delivered = rx.recv().await.unwrap();
        assert_eq!(delivered.days.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_codes_are_isolated() {
        let remote = MemoryRemote::default();
        remote.merge_write("abc", sample_payload()).await.unwrap();
        assert!(remote.fetch("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_code_is_rejected() {
        let remote = MemoryRemote::default();
        assert!(matches!(
            remote.fetch("../escape").await,
            Err(SyncError::InvalidCode(_))
        ));
        assert!(matches!(
            remote.fetch("").await,
            Err(SyncError::InvalidCode(_))
        ));
    }

    #[tokio::test]
    async fn test_file_remote_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FileRemote::new(dir.path().to_path_buf());

        remote.merge_write("abc", sample_payload()).await.unwrap();
        let doc = remote.fetch("abc").await.unwrap().unwrap();
        assert_eq!(doc.days.unwrap().len(), 1);

        // Partial write merges into the stored document
        remote
            .merge_write(
                "abc",
                SyncPayload {
                    presets: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let doc = remote.fetch("abc").await.unwrap().unwrap();
        assert_eq!(doc.days.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_remote_polling_delivers_updates() {
        let dir = tempfile::tempdir().unwrap();
        let subscriber = FileRemote::new(dir.path().to_path_buf())
            .with_poll_interval(Duration::from_millis(20));
        let mut rx = subscriber.subscribe("abc").await.unwrap();

        let writer = FileRemote::new(dir.path().to_path_buf());
        writer.merge_write("abc", sample_payload()).await.unwrap();

        let delivered = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("poller did not deliver in time")
            .unwrap();
        assert_eq!(delivered.days.unwrap().len(), 1);
    }
}
