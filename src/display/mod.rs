//! Display formatting for terminal output
//!
//! Every formatter returns a `String` so the CLI decides where it goes.

pub mod budget;
pub mod category;
pub mod chart;
pub mod format;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_list, format_budget_usage, format_suggestion};
pub use category::{format_category_details, format_category_list};
pub use chart::{format_merged, format_savings, format_series, key_label};
pub use transaction::{format_group_details, format_group_list, format_receipt};
