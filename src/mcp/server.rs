//! Tiny Deficit MCP Server Implementation
//!
//! Implements the MCP server with all journal tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::journal::Journal;
use crate::models::{ExercisePresetUpdate, FoodPresetUpdate, PresetItem};
use crate::tools::status::StatusTracker;
use crate::tools::{data, days, presets, progress, status, sync};

/// Tiny Deficit MCP Service
#[derive(Clone)]
pub struct JournalService {
    journal: Arc<Mutex<Journal>>,
    status_tracker: Arc<Mutex<StatusTracker>>,
    /// Root for exports, charts, and the sync directory
    data_dir: PathBuf,
    http: reqwest::Client,
    tool_router: ToolRouter<JournalService>,
}

impl JournalService {
    pub fn new(database_path: PathBuf, data_dir: PathBuf, journal: Journal) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            data_dir,
            http: reqwest::Client::new(),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Day Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    /// Offset for pagination
    #[serde(default)]
    pub offset: usize,
}

fn default_list_limit() -> usize { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetWeightParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Weight value, or null to clear the day's weight
    pub weight: Option<f64>,
    /// Unit: "lb" or "kg" (default lb)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Food name
    pub name: String,
    /// Calories eaten (negative values model corrections)
    pub calories: i64,
    /// Category, e.g. "Breakfast", "Lunch", "Snack"
    pub category: Option<String>,
    /// Portion description, e.g. "1 bowl"
    pub portion: Option<String>,
    /// Optional note
    pub note: Option<String>,
    /// Also save this food as a reusable preset (default false)
    #[serde(default)]
    pub save_as_preset: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveEntryParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Position of the entry within the day (0-based, as shown by get_day)
    pub index: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogExerciseParams {
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Exercise name
    pub name: String,
    /// Duration in minutes (must be positive)
    pub duration_minutes: i64,
    /// Calories burned (default 0)
    pub calories_burned: Option<i64>,
}

// ============================================================================
// Preset Parameter Structs
// ============================================================================

/// A named sub-item of a food preset
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PresetItemParam {
    pub name: String,
    pub calories: i64,
}

impl From<PresetItemParam> for PresetItem {
    fn from(p: PresetItemParam) -> Self {
        PresetItem {
            name: p.name,
            calories: p.calories,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodPresetParams {
    /// Preset name
    pub name: String,
    /// Total calories (ignored when items are given; then the item sum wins)
    #[serde(default)]
    pub calories: i64,
    /// Optional description
    pub description: Option<String>,
    /// Optional sub-items; the preset total is always their sum while present
    pub items: Option<Vec<PresetItemParam>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodPresetParams {
    /// Preset id
    pub id: String,
    /// New name (optional)
    pub name: Option<String>,
    /// New total calories (optional; ignored while sub-items exist)
    pub calories: Option<i64>,
    /// New description (optional)
    pub description: Option<String>,
    /// New sub-items (optional; empty array clears them)
    pub items: Option<Vec<PresetItemParam>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeletePresetParams {
    /// Preset id
    pub id: String,
    /// Must be true to actually delete
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ApplyPresetParams {
    /// Preset id
    pub preset_id: String,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExercisePresetParams {
    /// Preset name
    pub name: String,
    /// Duration in minutes (must be positive)
    pub duration_minutes: i64,
    /// Calories burned (default 0)
    #[serde(default)]
    pub calories_burned: i64,
    /// Optional description
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateExercisePresetParams {
    /// Preset id
    pub id: String,
    /// New name (optional)
    pub name: Option<String>,
    /// New duration in minutes (optional)
    pub duration_minutes: Option<i64>,
    /// New calories burned (optional)
    pub calories_burned: Option<i64>,
    /// New description (optional)
    pub description: Option<String>,
}

// ============================================================================
// Progress / Data Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeightTimelineParams {
    /// Unit: "lb" or "kg" (default lb)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeightChartParams {
    /// Unit: "lb" or "kg" (default lb)
    pub unit: Option<String>,
    /// Chart width in pixels (default 900)
    pub width: Option<u32>,
    /// Chart height in pixels (default 450)
    pub height: Option<u32>,
    /// Output PNG path (default: a dated file under the data directory)
    pub output_path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportDataParams {
    /// Output directory (default: exports under the data directory)
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportDataParams {
    /// The backup JSON document to import
    pub json: String,
    /// Must be true to overwrite a non-empty journal
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupFoodParams {
    /// Free-text food query, e.g. "banana" or "grilled chicken breast"
    pub query: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SyncConnectParams {
    /// Shared sync code agreed between devices (letters, digits, - and _)
    pub code: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

fn to_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl JournalService {
    // --- Status ---

    #[tool(description = "Get the current status of the journal service including build info, journal contents, sync state, and process information")]
    async fn journal_status(&self) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let tracker = self.status_tracker.lock().await;
        to_result(&tracker.get_status(&journal))
    }

    #[tool(description = "Get usage instructions for the journal. Call this when starting a session or when unsure how to use the tools.")]
    fn journal_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            status::JOURNAL_INSTRUCTIONS,
        )]))
    }

    // --- Days ---

    #[tool(description = "Get a day's full record (weight, foods, exercises) without creating it")]
    async fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let result = days::get_day(&journal, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(day) => to_result(&day),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Day not found", "date": "{}"}}"#,
                p.date
            ))])),
        }
    }

    #[tool(description = "Get a day by date, creating an empty record for it if none exists yet")]
    async fn get_or_create_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::get_or_create_day(&mut journal, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "List day summaries newest first, with optional date range and pagination")]
    async fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let result = days::list_days(
            &journal,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            p.limit,
            p.offset,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Set a day's weight in lb or kg (the other unit is derived automatically), or clear it by passing weight=null")]
    async fn set_weight(&self, Parameters(p): Parameters<SetWeightParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::set_weight(&mut journal, &p.date, p.weight, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Log a food entry to a day. Set save_as_preset=true to also save it as a reusable preset.")]
    async fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::log_food(
            &mut journal,
            &p.date,
            &p.name,
            p.calories,
            p.category,
            p.portion,
            p.note,
            p.save_as_preset,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Remove a food entry from a day by its 0-based position (as shown by get_day)")]
    async fn remove_food(&self, Parameters(p): Parameters<RemoveEntryParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::remove_food(&mut journal, &p.date, p.index)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Log an exercise entry to a day")]
    async fn log_exercise(&self, Parameters(p): Parameters<LogExerciseParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::log_exercise(
            &mut journal,
            &p.date,
            &p.name,
            p.duration_minutes,
            p.calories_burned,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Remove an exercise entry from a day by its 0-based position")]
    async fn remove_exercise(&self, Parameters(p): Parameters<RemoveEntryParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = days::remove_exercise(&mut journal, &p.date, p.index)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Get eaten/burned/net calorie totals for a date (all zeros for an untracked day)")]
    async fn day_totals(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let result =
            days::day_totals(&journal, &p.date).map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    // --- Presets ---

    #[tool(description = "List all food and exercise presets")]
    async fn list_presets(&self) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        to_result(&presets::list_presets(&journal))
    }

    #[tool(description = "Create a reusable food preset. When sub-items are given the preset total is their sum.")]
    async fn add_food_preset(&self, Parameters(p): Parameters<AddFoodPresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let items = p.items.map(|items| items.into_iter().map(Into::into).collect());
        let result = presets::add_food_preset(&mut journal, &p.name, p.calories, p.description, items)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Partially update a food preset by id. Only supplied fields change; pass items=[] to clear sub-items.")]
    async fn update_food_preset(&self, Parameters(p): Parameters<UpdateFoodPresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let update = FoodPresetUpdate {
            name: p.name,
            default_calories: p.calories,
            description: p.description,
            items: p.items.map(|items| items.into_iter().map(Into::into).collect()),
        };
        let result = presets::update_food_preset(&mut journal, &p.id, update)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Delete a food preset by id (requires force=true). Entries logged from it are unchanged.")]
    async fn delete_food_preset(&self, Parameters(p): Parameters<DeletePresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = presets::delete_food_preset(&mut journal, &p.id, p.force)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Apply a food preset to a date, logging its name and calories as a food entry")]
    async fn apply_food_preset(&self, Parameters(p): Parameters<ApplyPresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = presets::apply_food_preset(&mut journal, &p.preset_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Create a reusable exercise preset")]
    async fn add_exercise_preset(&self, Parameters(p): Parameters<AddExercisePresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = presets::add_exercise_preset(
            &mut journal,
            &p.name,
            p.duration_minutes,
            p.calories_burned,
            p.description,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Partially update an exercise preset by id")]
    async fn update_exercise_preset(&self, Parameters(p): Parameters<UpdateExercisePresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let update = ExercisePresetUpdate {
            name: p.name,
            duration_minutes: p.duration_minutes,
            calories_burned: p.calories_burned,
            description: p.description,
        };
        let result = presets::update_exercise_preset(&mut journal, &p.id, update)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Delete an exercise preset by id (requires force=true)")]
    async fn delete_exercise_preset(&self, Parameters(p): Parameters<DeletePresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = presets::delete_exercise_preset(&mut journal, &p.id, p.force)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Apply an exercise preset to a date, logging it as an exercise entry")]
    async fn apply_exercise_preset(&self, Parameters(p): Parameters<ApplyPresetParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = presets::apply_exercise_preset(&mut journal, &p.preset_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Get the day-by-day weight series in lb or kg, with gap days filled by linear interpolation (marked interpolated=true)")]
    async fn weight_timeline(&self, Parameters(p): Parameters<WeightTimelineParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let result = progress::weight_timeline(&journal, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Render the weight trend as a PNG chart file and return its path")]
    async fn weight_chart(&self, Parameters(p): Parameters<WeightChartParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let path = match p.output_path {
            Some(path) => PathBuf::from(path),
            None => self.data_dir.join("charts").join(format!(
                "weight-chart-{}.png",
                chrono::Local::now().format("%Y-%m-%d")
            )),
        };
        let result = progress::weight_chart(&journal, p.unit.as_deref(), p.width, p.height, &path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    // --- Data ---

    #[tool(description = "Export the whole journal to a dated JSON backup file and return its path")]
    async fn export_data(&self, Parameters(p): Parameters<ExportDataParams>) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        let dir = match p.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => self.data_dir.join("exports"),
        };
        let result =
            data::export_data(&journal, &dir).map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Import a backup JSON document, replacing the whole journal. Overwriting a non-empty journal requires force=true.")]
    async fn import_data(&self, Parameters(p): Parameters<ImportDataParams>) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        let result = data::import_data(&mut journal, &p.json, p.force)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Look up a calorie estimate for a food from USDA FoodData Central")]
    async fn lookup_food_calories(&self, Parameters(p): Parameters<LookupFoodParams>) -> Result<CallToolResult, McpError> {
        let result = data::lookup_food_calories(&self.http, &p.query)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    // --- Sync ---

    #[tool(description = "Join (or seed) a sync session so journals sharing the code converge. If the remote already has data for the code, it replaces this journal.")]
    async fn sync_connect(&self, Parameters(p): Parameters<SyncConnectParams>) -> Result<CallToolResult, McpError> {
        let sync_dir = self.data_dir.join("sync");
        let result = sync::sync_connect(&self.journal, &sync_dir, &p.code)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_result(&result)
    }

    #[tool(description = "Get the current sync session state")]
    async fn sync_status(&self) -> Result<CallToolResult, McpError> {
        let journal = self.journal.lock().await;
        to_result(&sync::sync_status(&journal))
    }

    #[tool(description = "Leave the sync session; local data stays as it is")]
    async fn sync_disconnect(&self) -> Result<CallToolResult, McpError> {
        let mut journal = self.journal.lock().await;
        to_result(&sync::sync_disconnect(&mut journal))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for JournalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tinydeficit".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Tiny Deficit".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tiny Deficit - a per-day calorie and weight journal. \
                 IMPORTANT: Call journal_instructions when starting a session. \
                 Days: get_day/get_or_create_day/list_days/day_totals, set_weight (lb or kg). \
                 Entries: log_food (save_as_preset=true to reuse), remove_food, log_exercise, remove_exercise. \
                 Presets: list_presets, add/update/delete_food_preset, add/update/delete_exercise_preset, \
                 apply_food_preset/apply_exercise_preset. delete_*_preset require force=true. \
                 Progress: weight_timeline (interpolated gap fill), weight_chart (PNG file). \
                 Data: export_data/import_data (force=true to overwrite), lookup_food_calories. \
                 Sync: sync_connect/sync_status/sync_disconnect."
                    .into(),
            ),
        }
    }
}
