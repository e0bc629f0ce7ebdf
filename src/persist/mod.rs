//! Persistence layer
//!
//! A narrow adapter seam between the journal and its backing store. The
//! journal only ever loads or saves the whole [`AppState`] document, so
//! the adapter is two methods.

pub mod export;
pub mod sqlite;

use std::sync::Mutex;

use crate::error::JournalResult;
use crate::models::AppState;

pub use sqlite::SqliteStore;

/// Storage backend for the journal document. Saves replace the whole
/// document atomically.
pub trait PersistenceAdapter: Send + Sync {
    /// Load the persisted document, `None` when nothing usable is stored
    fn load(&self) -> JournalResult<Option<AppState>>;

    /// Persist the document, replacing any previous one
    fn save(&self, state: &AppState) -> JournalResult<()>;
}

/// In-memory adapter for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<Option<AppState>>,
}

impl PersistenceAdapter for MemoryStore {
    fn load(&self) -> JournalResult<Option<AppState>> {
        Ok(self
            .doc
            .lock()
            .ok()
            .and_then(|guard| guard.clone()))
    }

    fn save(&self, state: &AppState) -> JournalResult<()> {
        if let Ok(mut guard) = self.doc.lock() {
            *guard = Some(state.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::days::set_weight;
    use crate::weight::WeightUnit;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::default();
        assert!(store.load().unwrap().is_none());

        let mut state = AppState::default();
        set_weight(&mut state, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.days.len(), 1);
        assert_eq!(loaded.days[0].weight_lb, Some(150.0));
    }
}
