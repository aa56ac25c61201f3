//! Path management for budgetwise
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGETWISE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/budgetwise` on Linux,
//!    `~/Library/Application Support/budgetwise` on macOS, `%APPDATA%` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetwiseError;

/// Manages all paths used by budgetwise
#[derive(Debug, Clone)]
pub struct BudgetwisePaths {
    /// Base directory for all budgetwise data
    base_dir: PathBuf,
}

impl BudgetwisePaths {
    /// Create a new BudgetwisePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetwiseError> {
        let base_dir = if let Ok(custom) = std::env::var("BUDGETWISE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetwisePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the stored access/refresh token pair
    pub fn tokens_file(&self) -> PathBuf {
        self.data_dir().join("tokens.json")
    }

    /// Get the path to the last bank sync cursor
    pub fn sync_cursor_file(&self) -> PathBuf {
        self.data_dir().join("sync_cursor.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetwiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetwiseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetwiseError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if budgetwise has been configured (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetwiseError> {
    ProjectDirs::from("", "", "budgetwise")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BudgetwiseError::Config("Could not determine home directory".into()))
}
