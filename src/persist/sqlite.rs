//! SQLite persistence
//!
//! Stores the journal document as one JSON blob in the `snapshots` table.
//! A corrupt stored document is logged and treated as absent rather than
//! failing startup; the journal then begins empty and the next save
//! replaces the bad row.

use rusqlite::params;
use tracing::warn;

use crate::db::Database;
use crate::error::JournalResult;
use crate::models::AppState;

use super::PersistenceAdapter;

/// Fixed key for the single journal document
const SNAPSHOT_KEY: &str = "journal";

/// SQLite-backed adapter over the shared connection pool
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl PersistenceAdapter for SqliteStore {
    fn load(&self) -> JournalResult<Option<AppState>> {
        let conn = self.db.get_conn()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM snapshots WHERE key = ?1",
                params![SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(crate::db::DbError::from(other)),
            })?;

        let Some(document) = document else {
            return Ok(None);
        };

        match serde_json::from_str::<AppState>(&document) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!("Stored journal document is unreadable, starting empty: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, state: &AppState) -> JournalResult<()> {
        let document = serde_json::to_string(state)?;
        let conn = self.db.get_conn()?;
        conn.execute(
            "INSERT INTO snapshots (key, document, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at",
            params![SNAPSHOT_KEY, document],
        )
        .map_err(crate::db::DbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::store::days::{append_food, NewFood};

    fn open_store(dir: &tempfile::TempDir) -> SqliteStore {
        let db = Database::new(dir.path().join("journal.db")).unwrap();
        run_migrations(&db.get_conn().unwrap()).unwrap();
        SqliteStore::new(db)
    }

    #[test]
    fn test_load_on_fresh_database_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let mut state = AppState::default();
        append_food(
            &mut state,
            "2025-01-13",
            NewFood {
                name: "Oatmeal".to_string(),
                calories: 300,
                ..Default::default()
            },
        )
        .unwrap();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.days[0].foods[0].name, "Oatmeal");
    }

    #[test]
    fn test_save_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let mut state = AppState::default();
        store.save(&state).unwrap();
        append_food(
            &mut state,
            "2025-01-13",
            NewFood {
                name: "Oatmeal".to_string(),
                calories: 300,
                ..Default::default()
            },
        )
        .unwrap();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.days.len(), 1);
    }

    #[test]
    fn test_corrupt_document_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let conn = store.db.get_conn().unwrap();
        conn.execute(
            "INSERT INTO snapshots (key, document) VALUES (?1, 'not json')",
            params![SNAPSHOT_KEY],
        )
        .unwrap();

        assert!(store.load().unwrap().is_none());
    }
}
