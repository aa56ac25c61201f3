//! User settings for budgetwise
//!
//! Manages the API location, chart preferences and bank sync pacing.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::BudgetwisePaths;
use crate::error::BudgetwiseError;

/// First day of the week used for weekly chart buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }
}

/// User settings for budgetwise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the budgeting REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How many months the budget projection covers
    #[serde(default = "default_projection_months")]
    pub projection_months: u32,

    /// First day of week for weekly buckets
    #[serde(default)]
    pub week_start: WeekStart,

    /// Delay between polls while the aggregator has no sync page ready
    #[serde(default = "default_sync_retry_delay_ms")]
    pub sync_retry_delay_ms: u64,

    /// Polls allowed before a sync is abandoned
    #[serde(default = "default_sync_max_attempts")]
    pub sync_max_attempts: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_projection_months() -> u32 {
    6
}

fn default_sync_retry_delay_ms() -> u64 {
    2000
}

fn default_sync_max_attempts() -> u32 {
    30
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            projection_months: default_projection_months(),
            week_start: WeekStart::default(),
            sync_retry_delay_ms: default_sync_retry_delay_ms(),
            sync_max_attempts: default_sync_max_attempts(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    ///
    /// `BUDGETWISE_API_URL` overrides the stored base URL.
    pub fn load_or_create(paths: &BudgetwisePaths) -> Result<Self, BudgetwiseError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetwiseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                BudgetwiseError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        if let Ok(url) = std::env::var("BUDGETWISE_API_URL") {
            if !url.trim().is_empty() {
                settings.api_base_url = url;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetwisePaths) -> Result<(), BudgetwiseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetwiseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BudgetwiseError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings the rest of the crate cannot work with
    pub fn validate(&self) -> Result<(), BudgetwiseError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BudgetwiseError::Config(format!(
                "API base URL must start with http:// or https://: {}",
                self.api_base_url
            )));
        }
        if self.sync_max_attempts == 0 {
            return Err(BudgetwiseError::Config(
                "sync_max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.projection_months, 6);
        assert_eq!(settings.week_start, WeekStart::Monday);
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetwisePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.week_start = WeekStart::Sunday;
        settings.projection_months = 3;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.week_start, WeekStart::Sunday);
        assert_eq!(loaded.projection_months, 3);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"api_base_url": "https://budget.example.com/api"}"#).unwrap();
        assert_eq!(settings.api_base_url, "https://budget.example.com/api");
        assert_eq!(settings.sync_retry_delay_ms, 2000);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let settings = Settings {
            api_base_url: "localhost:8000".into(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
