//! Core data models for budgetwise
//!
//! Records exchanged with the budgeting API: categories, budgets with their
//! per-category items, transaction groups and their transactions, the user.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;
pub mod user;

pub use budget::{active_budget, Budget, BudgetInput, BudgetItem, BudgetItemInput};
pub use category::{Category, CategoryInput};
pub use ids::{BudgetId, BudgetItemId, CategoryId, TransactionGroupId, TransactionId, UserId};
pub use money::Money;
pub use period::{Granularity, Month};
pub use transaction::{Transaction, TransactionGroup, TransactionGroupInput, TransactionInput};
pub use user::{User, UserUpdate};
