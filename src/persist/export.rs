//! Backup export
//!
//! Writes the whole journal document to a dated JSON file. The companion
//! import path lives in the models layer ([`crate::models::parse_import`])
//! so its validation can run before any state is touched.

use std::path::{Path, PathBuf};

use crate::error::JournalResult;
use crate::models::AppState;

/// Write a pretty-printed backup of the document into `dir`, returning
/// the path. The filename carries the local date, so a second export on
/// the same day overwrites the first.
pub fn export_snapshot(state: &AppState, dir: &Path) -> JournalResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let filename = format!(
        "tiny-deficit-backup-{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
