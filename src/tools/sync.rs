//! Sync session tools
//!
//! Connect to, inspect, and leave a sync session. The remote here is a
//! shared directory; any journal pointed at the same directory and code
//! converges on the same document.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::journal::Journal;
use crate::sync::{connect, FileRemote, SyncStatus};

/// Join (or seed) the sync session for a code.
///
/// Takes the shared journal handle rather than a locked guard: connecting
/// exchanges documents with the remote and must be able to lock the
/// journal itself.
pub async fn sync_connect(
    journal: &Arc<Mutex<Journal>>,
    sync_dir: &Path,
    code: &str,
) -> Result<SyncStatus, String> {
    let remote = Arc::new(FileRemote::new(sync_dir.to_path_buf()));
    let handle = connect(journal, remote, code)
        .await
        .map_err(|e| format!("Failed to connect: {}", e))?;

    let status = SyncStatus {
        connected: true,
        active: handle.is_active(),
        code: Some(handle.code().to_string()),
    };
    journal.lock().await.set_sync(Some(handle));
    Ok(status)
}

/// Current sync session state
pub fn sync_status(journal: &Journal) -> SyncStatus {
    match journal.sync() {
        Some(handle) => SyncStatus {
            connected: true,
            active: handle.is_active(),
            code: Some(handle.code().to_string()),
        },
        None => SyncStatus {
            connected: false,
            active: false,
            code: None,
        },
    }
}

/// Leave the sync session; local data stays as it is
pub fn sync_disconnect(journal: &mut Journal) -> SyncStatus {
    journal.set_sync(None);
    SyncStatus {
        connected: false,
        active: false,
        code: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::store::days::set_weight;
    use crate::weight::WeightUnit;

    fn new_journal() -> Arc<Mutex<Journal>> {
        Arc::new(Mutex::new(
            Journal::open(Box::new(MemoryStore::default())).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_connect_then_status_then_disconnect() {
        let journal = new_journal();
        let dir = tempfile::tempdir().unwrap();

        let status = sync_connect(&journal, dir.path(), "kitchen-42").await.unwrap();
        assert!(status.connected && status.active);
        assert_eq!(status.code.as_deref(), Some("kitchen-42"));

        {
            let guard = journal.lock().await;
            assert!(sync_status(&guard).connected);
        }

        let mut guard = journal.lock().await;
        let after = sync_disconnect(&mut guard);
        assert!(!after.connected);
        assert!(guard.sync().is_none());
    }

    #[tokio::test]
    async fn test_connect_seeds_shared_directory() {
        let journal = new_journal();
        journal
            .lock()
            .await
            .mutate(|s| set_weight(s, "2025-01-13", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        sync_connect(&journal, dir.path(), "abc").await.unwrap();
        assert!(dir.path().join("abc.json").exists());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_code() {
        let journal = new_journal();
        let dir = tempfile::tempdir().unwrap();
        assert!(sync_connect(&journal, dir.path(), "../escape").await.is_err());
    }
}
