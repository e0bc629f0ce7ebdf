//! Journal controller
//!
//! Owns the in-memory [`AppState`] and coordinates the layers around it:
//! every successful mutation is persisted through the adapter and, when a
//! sync session is active, pushed to the remote store. Mutations run on a
//! working copy, so a failed operation leaves both memory and storage
//! exactly as they were.

use tracing::info;

use crate::error::JournalResult;
use crate::models::AppState;
use crate::persist::PersistenceAdapter;
use crate::sync::{apply_payload, SyncHandle, SyncPayload};

pub struct Journal {
    state: AppState,
    store: Box<dyn PersistenceAdapter>,
    sync: Option<SyncHandle>,
}

impl Journal {
    /// Load the journal from its backing store; an absent or unreadable
    /// document starts the journal empty.
    pub fn open(store: Box<dyn PersistenceAdapter>) -> JournalResult<Self> {
        let state = store.load()?.unwrap_or_default();
        info!(
            days = state.days.len(),
            presets = state.presets.len(),
            "Journal loaded"
        );
        Ok(Self {
            state,
            store,
            sync: None,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run a state transition. The closure operates on a working copy;
    /// only when it succeeds is the result persisted, swapped in, and
    /// pushed to the remote.
    pub fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut AppState) -> JournalResult<T>,
    ) -> JournalResult<T> {
        let mut next = self.state.clone();
        let out = f(&mut next)?;
        self.store.save(&next)?;
        self.state = next;
        self.push_to_remote();
        Ok(out)
    }

    /// Replace the whole document, as import does. Persisted and pushed
    /// like any other mutation.
    pub fn replace_state(&mut self, state: AppState) -> JournalResult<()> {
        self.store.save(&state)?;
        self.state = state;
        self.push_to_remote();
        Ok(())
    }

    /// Apply an inbound payload from the remote store. Persisted but NOT
    /// pushed back, so remote updates cannot echo.
    pub fn apply_remote(&mut self, payload: SyncPayload) -> JournalResult<()> {
        apply_payload(&mut self.state, payload);
        self.store.save(&self.state)
    }

    pub fn set_sync(&mut self, handle: Option<SyncHandle>) {
        if let Some(old) = self.sync.take() {
            old.disconnect();
        }
        self.sync = handle;
    }

    pub fn sync(&self) -> Option<&SyncHandle> {
        self.sync.as_ref()
    }

    /// The whole document as a payload, for the initial remote write
    pub fn full_payload(&self) -> SyncPayload {
        SyncPayload::full(&self.state)
    }

    fn push_to_remote(&self) {
        if let Some(sync) = &self.sync {
            sync.push(self.full_payload());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use crate::persist::MemoryStore;
    use crate::store::days::{append_food, set_weight, NewFood};
    use crate::weight::WeightUnit;

    #[test]
    fn test_open_empty_store_starts_empty() {
        let journal = Journal::open(Box::new(MemoryStore::default())).unwrap();
        assert!(journal.state().is_empty());
    }

    #[test]
    fn test_mutation_is_persisted() {
        let mut journal = Journal::open(Box::new(MemoryStore::default())).unwrap();
        journal
            .mutate(|state| set_weight(state, "2025-01-13", Some(150.0), WeightUnit::Lb).map(|_| ()))
            .unwrap();
        assert_eq!(journal.state().days.len(), 1);
    }

    #[test]
    fn test_failed_mutation_changes_nothing() {
        let mut journal = Journal::open(Box::new(MemoryStore::default())).unwrap();
        let err = journal
            .mutate(|state| {
                append_food(
                    state,
                    "2025-01-13",
                    NewFood {
                        name: "meal".to_string(),
                        calories: 300,
                        ..Default::default()
                    },
                )?;
                // A later failure must roll back the food above
                Err::<(), _>(JournalError::Validation("boom".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert!(journal.state().is_empty());
    }

    #[test]
    fn test_replace_state_swaps_document() {
        let mut journal = Journal::open(Box::new(MemoryStore::default())).unwrap();
        let mut incoming = AppState::default();
        set_weight(&mut incoming, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        journal.replace_state(incoming).unwrap();
        assert_eq!(journal.state().days.len(), 1);
    }

    #[test]
    fn test_apply_remote_merges_payload() {
        let mut journal = Journal::open(Box::new(MemoryStore::default())).unwrap();
        let mut other = AppState::default();
        set_weight(&mut other, "2025-01-13", Some(150.0), WeightUnit::Lb).unwrap();
        journal.apply_remote(SyncPayload::full(&other)).unwrap();
        assert_eq!(journal.state().days.len(), 1);
    }
}
