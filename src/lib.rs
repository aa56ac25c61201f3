//! budgetwise - personal budgeting client
//!
//! This library provides the core functionality for the budgetwise client. It
//! talks to a budgeting REST API, caches its entities, and turns transaction
//! history plus the active budget into spending, projection and savings
//! series.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: API records (categories, budgets, transaction groups, the user)
//! - `api`: Authenticated REST client with token refresh
//! - `resources`: Cached per-entity access to the API
//! - `analytics`: Chart data aggregation (bucketing, projection, merging, savings)
//! - `integrations`: Server-proxied bank aggregation and AI assistance
//! - `display`: Terminal tables
//! - `export`: CSV export
//! - `storage`: Local JSON files (tokens, sync cursor)
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetwise::analytics::ChartData;
//!
//! let data = ChartData::build(&groups, &categories, budget.as_ref(), today, 6, Weekday::Mon);
//! println!("{} months of spending", data.monthly_expenses.len());
//! ```

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod integrations;
pub mod models;
pub mod resources;
pub mod storage;

pub use error::{BudgetwiseError, BudgetwiseResult};
