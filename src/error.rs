//! Custom error types for budgetwise
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every failure the user sees goes through
//! [`BudgetwiseError::toast`], which renders the single-line notification text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for budgetwise operations
#[derive(Error, Debug)]
pub enum BudgetwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Transport-level failures (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status returned by the API
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No usable credentials: never logged in, or refresh was rejected
    #[error("Session expired: {0}")]
    AuthExpired(String),

    /// Bank synchronisation errors
    #[error("Bank sync error: {0}")]
    Sync(String),

    /// AI assistance errors
    #[error("AI assistant error: {0}")]
    Ai(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetwiseError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget items
    pub fn budget_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transaction groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Api { status: 404, .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the user has to log in again
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    /// One-line notification text shown to the user
    pub fn toast(&self) -> String {
        match self {
            Self::AuthExpired(_) => {
                "Your session has expired. Run 'budgetwise login' to sign in again.".to_string()
            }
            Self::Api { status, message } if *status >= 500 => {
                format!("The server had a problem ({}): {}", status, message)
            }
            Self::Network(_) => format!("{}. Check your connection and API URL.", self),
            other => other.to_string(),
        }
    }
}

/// JSON error envelope returned by the API (`{"error": "..."}`)
///
/// Some endpoints use `message` instead of `error`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Parse an envelope from a response body, if it is one
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|e| e.error.is_some() || e.message.is_some())
    }

    /// The human-readable message carried by the envelope
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BudgetwiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetwiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for BudgetwiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<csv::Error> for BudgetwiseError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for budgetwise operations
pub type BudgetwiseResult<T> = Result<T, BudgetwiseError>;
