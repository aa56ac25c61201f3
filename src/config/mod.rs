//! Configuration module for budgetwise
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BudgetwisePaths;
pub use settings::{Settings, WeekStart};
