//! Category model
//!
//! A category labels transactions and budget allocations as income or
//! expense and carries the color used for its chart series. Legacy categories
//! are retired from pickers but still resolve for historical transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Fallback color for categories created without one
pub const DEFAULT_COLOR: &str = "#8884d8";

/// A budgeting category as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    /// Income categories add to totals; expense categories subtract
    #[serde(default)]
    pub is_income: bool,

    /// Display color as `#RRGGBB`
    #[serde(default = "default_color")]
    pub color: String,

    /// Retired category kept only so old transactions still resolve
    #[serde(default)]
    pub legacy: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Category {
    /// Build a category locally (tests, drafts converted after a create)
    pub fn new(name: impl Into<String>, is_income: bool) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            is_income,
            color: default_color(),
            legacy: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn kind(&self) -> &'static str {
        if self.is_income {
            "income"
        } else {
            "expense"
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Request body for creating or updating a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub is_income: bool,
    pub color: String,
    #[serde(default)]
    pub legacy: bool,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, is_income: bool) -> Self {
        Self {
            name: name.into().trim().to_string(),
            is_income,
            color: default_color(),
            legacy: false,
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)?;
        validate_color(&self.color)
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            is_income: category.is_income,
            color: category.color.clone(),
            legacy: category.legacy,
        }
    }
}

fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    if name.chars().count() > 50 {
        return Err(CategoryValidationError::NameTooLong(name.chars().count()));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), CategoryValidationError> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| CategoryValidationError::InvalidColor(color.to_string()))?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CategoryValidationError::InvalidColor(color.to_string()));
    }
    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::InvalidColor(c) => write!(f, "Color must look like #RRGGBB, got '{}'", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
