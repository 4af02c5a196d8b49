// --- File: crates/clinica_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Remote Clinic API Config ---
// The bearer token is usually written as "secret_from_env" and injected from API_TOKEN.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,  // Mandatory, e.g. https://api.clinica.example/v1
    pub tenant_id: String, // Mandatory, sent as X-Tenant-Id on every request
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// --- Scheduling Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Input stability window before an availability probe is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// IANA zone of the clinic; appointment lists are keyed by local day.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            time_zone: default_time_zone(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // API config is mandatory
    pub api: ApiConfig,

    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_time_zone() -> String {
    "Europe/Zurich".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
