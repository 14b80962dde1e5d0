//! Configuration types and loading
//!
//! Settings come from an optional file plus `LEDGERVIEW__*` environment
//! variables (nested keys separated by `__`), layered over built-in defaults:
//!
//! ```text
//! LEDGERVIEW__TABLES__FIRST_DAY_OF_WEEK=1
//! LEDGERVIEW__TABLES__DATE_FIELDS=transaction_date,date,createdAt
//! LEDGERVIEW__LOGGING__FILTER=debug
//! ```

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::LvError;
use crate::result::LvResult;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LEDGERVIEW";

/// Candidate date fields, in lookup order
pub const DEFAULT_DATE_FIELDS: [&str; 3] = ["transaction_date", "date", "createdAt"];

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table engine settings
    pub tables: TablesConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Fields probed, in order, for a record's date
    pub date_fields: Vec<String>,
    /// First day of week (0 = Sunday, 1 = Monday, ... 6 = Saturday)
    pub first_day_of_week: u8,
    /// Offset used for calendar boundaries; `None` uses the host's local offset
    pub utc_offset_minutes: Option<i32>,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            date_fields: DEFAULT_DATE_FIELDS.iter().map(|s| s.to_string()).collect(),
            first_day_of_week: 0,
            utc_offset_minutes: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,lv_tables=debug".to_string(),
            json: false,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> LvResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("tables.date_fields"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            date_fields = ?config.tables.date_fields,
            first_day_of_week = config.tables.first_day_of_week,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> LvResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> LvResult<()> {
        if self.tables.first_day_of_week > 6 {
            return Err(LvError::Config(format!(
                "tables.first_day_of_week must be 0-6, got {}",
                self.tables.first_day_of_week
            )));
        }
        if self.tables.date_fields.iter().all(|f| f.trim().is_empty()) {
            return Err(LvError::Config(
                "tables.date_fields must name at least one field".to_string(),
            ));
        }
        if let Some(minutes) = self.tables.utc_offset_minutes {
            if minutes.unsigned_abs() >= 24 * 60 {
                return Err(LvError::Config(format!(
                    "tables.utc_offset_minutes out of range: {}",
                    minutes
                )));
            }
        }
        Ok(())
    }
}
