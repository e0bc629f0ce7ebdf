//! Journal status tool
//!
//! Provides runtime status information about the Tiny Deficit service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::journal::Journal;
use crate::sync::SyncStatus;

use super::sync::sync_status;

/// Usage instructions for AI assistants
pub const JOURNAL_INSTRUCTIONS: &str = r#"
# Tiny Deficit Journal Instructions

A calorie and weight journal organized by calendar day.

## Core ideas

- Every record hangs off a date (YYYY-MM-DD). Days are created automatically
  the first time anything is logged for them; just call the logging tool.
- Food entries count calories eaten; exercise entries count calories burned.
  Net = eaten - burned, shown by `day_totals` and in day summaries.
- Weight can be set in lb or kg; the other unit is derived automatically
  (rounded to one decimal). Setting weight to null clears it.
- Presets are reusable templates. `apply_food_preset` / `apply_exercise_preset`
  copy a preset into a day; editing or deleting a preset afterwards never
  changes entries already logged from it.
- Food presets can carry sub-items; the preset total is always their sum
  while sub-items exist.

## Typical flows

| Task | Tool |
|------|------|
| Log a meal | `log_food` (set save_as_preset=true to reuse it later) |
| Log a workout | `log_exercise` |
| Record weight | `set_weight` |
| Day summary | `get_day`, `day_totals` |
| Recent days | `list_days` |
| Weight trend | `weight_timeline`, `weight_chart` (PNG file) |
| Reuse a meal | `list_presets` then `apply_food_preset` |
| Estimate calories | `lookup_food_calories` |
| Backup / restore | `export_data`, `import_data` (force=true to overwrite) |
| Share across devices | `sync_connect` with an agreed code |

## Cautions

- `delete_food_preset`, `delete_exercise_preset`, and `import_data` over an
  existing journal require force=true; without it they return a confirmation
  message and change nothing.
- `remove_food` / `remove_exercise` address entries by their position in the
  day (0-based), as shown by `get_day`.
- Weight timeline points with `interpolated: true` are gap-fill estimates,
  not measurements.
"#;

/// Runtime status of the journal service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Journal contents
    pub days_tracked: usize,
    pub presets: usize,
    pub exercise_presets: usize,
    pub sync: SyncStatus,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, journal: &Journal) -> JournalStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        let state = journal.state();
        JournalStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            days_tracked: state.days.len(),
            presets: state.presets.len(),
            exercise_presets: state.exercise_presets.len(),
            sync: sync_status(journal),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
