//! Cached access to the API's entities
//!
//! Each resource wraps one endpoint family. Lists are cached after the first
//! fetch and served from memory until a mutation invalidates them.

pub mod budgets;
pub mod cache;
pub mod categories;
pub mod transactions;
pub mod user;

pub use budgets::{BudgetItemResource, BudgetResource};
pub use cache::EntityCache;
pub use categories::CategoryResource;
pub use transactions::{TransactionGroupResource, TransactionResource};
pub use user::UserResource;

use crate::api::ApiClient;

/// Every resource over one shared client
pub struct Resources {
    pub categories: CategoryResource,
    pub budgets: BudgetResource,
    pub budget_items: BudgetItemResource,
    pub groups: TransactionGroupResource,
    pub transactions: TransactionResource,
    pub user: UserResource,
}

impl Resources {
    pub fn new(api: ApiClient) -> Self {
        let budgets = BudgetResource::new(api.clone());
        let groups = TransactionGroupResource::new(api.clone());
        Self {
            categories: CategoryResource::new(api.clone()),
            budget_items: budgets.items(),
            transactions: groups.transactions(),
            budgets,
            groups,
            user: UserResource::new(api),
        }
    }
}
