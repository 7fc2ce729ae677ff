// --- File: crates/slotwise_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/slotwise.db, overridable via SLOTWISE__DATABASE__URL
}

// --- Scheduling Config ---
// Knobs for slot generation and the booking allocator. Every field has a
// default so a bare config file still yields a working scheduler.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA timezone in which interviewer wall-clock ranges are interpreted.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Fixed slot grain in minutes.
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u16,
    /// How far ahead (in days) availability may be declared.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u16,
    /// When true, students are matched only against interviewers in their
    /// roster department.
    #[serde(default)]
    pub department_affinity: bool,
    /// Base URL used to mint a fallback meeting link when the calendar
    /// integration is unavailable or fails.
    #[serde(default = "default_fallback_link_base")]
    pub fallback_link_base: String,
}

fn default_time_zone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_slot_duration() -> u16 {
    30
}

fn default_horizon_days() -> u16 {
    15
}

fn default_fallback_link_base() -> String {
    "https://meet.example.com".to_string()
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            slot_duration_minutes: default_slot_duration(),
            horizon_days: default_horizon_days(),
            department_affinity: false,
            fallback_link_base: default_fallback_link_base(),
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
