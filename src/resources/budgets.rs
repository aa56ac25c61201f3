//! Budgets and budget items resources
//!
//! Items live under their budget (`/budgets/{id}/items`), so any item
//! mutation also invalidates the budget cache.

use std::sync::Arc;

use chrono::NaiveDate;
use log::info;

use super::cache::EntityCache;
use crate::api::ApiClient;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{
    active_budget, Budget, BudgetId, BudgetInput, BudgetItem, BudgetItemId, BudgetItemInput,
};

const PATH: &str = "/budgets";

type BudgetCache = EntityCache<BudgetId, Budget>;

/// Cached CRUD access to `/budgets`
pub struct BudgetResource {
    api: ApiClient,
    cache: Arc<BudgetCache>,
}

impl BudgetResource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Arc::new(EntityCache::new()),
        }
    }

    /// Item resource sharing this resource's cache
    pub fn items(&self) -> BudgetItemResource {
        BudgetItemResource {
            api: self.api.clone(),
            budgets: Arc::clone(&self.cache),
        }
    }

    /// All budgets, oldest first
    pub async fn list(&self) -> BudgetwiseResult<Vec<Budget>> {
        let mut budgets = match self.cache.all()? {
            Some(cached) => cached,
            None => {
                let fetched: Vec<Budget> = self.api.get_json(PATH).await?;
                self.cache.fill(fetched.iter().cloned(), |b| b.id)?;
                fetched
            }
        };
        budgets.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.name.cmp(&b.name)));
        Ok(budgets)
    }

    pub async fn get(&self, id: BudgetId) -> BudgetwiseResult<Budget> {
        if let Some(budget) = self.cache.get(id)? {
            return Ok(budget);
        }

        let budget: Budget = self
            .api
            .get_json(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.put(id, budget.clone())?;
        Ok(budget)
    }

    /// Find a budget by name (case-insensitive), full id or short id
    pub async fn find(&self, identifier: &str) -> BudgetwiseResult<Budget> {
        let identifier = identifier.trim();
        let wanted = identifier.to_lowercase();
        let parsed = identifier.parse::<BudgetId>().ok();

        self.list()
            .await?
            .into_iter()
            .find(|b| {
                b.name.to_lowercase() == wanted || Some(b.id) == parsed || b.id.short() == identifier
            })
            .ok_or_else(|| BudgetwiseError::budget_not_found(identifier))
    }

    /// The budget in effect on `date`, if any
    pub async fn active(&self, date: NaiveDate) -> BudgetwiseResult<Option<Budget>> {
        let budgets = self.list().await?;
        Ok(active_budget(&budgets, date).cloned())
    }

    pub async fn create(&self, input: &BudgetInput) -> BudgetwiseResult<Budget> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let created: Budget = self.api.post_json(PATH, input).await?;
        self.cache.invalidate()?;
        info!("Created budget {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: BudgetId, input: &BudgetInput) -> BudgetwiseResult<Budget> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let updated: Budget = self
            .api
            .put_json(&format!("{}/{}", PATH, id), input)
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Updated budget {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: BudgetId) -> BudgetwiseResult<()> {
        self.api
            .delete(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Deleted budget {}", id);
        Ok(())
    }
}

/// CRUD access to `/budgets/{id}/items`
pub struct BudgetItemResource {
    api: ApiClient,
    budgets: Arc<BudgetCache>,
}

impl BudgetItemResource {
    fn items_path(budget_id: BudgetId) -> String {
        format!("{}/{}/items", PATH, budget_id)
    }

    pub async fn list(&self, budget_id: BudgetId) -> BudgetwiseResult<Vec<BudgetItem>> {
        self.api
            .get_json(&Self::items_path(budget_id))
            .await
            .map_err(|e| not_found_as(e, budget_id))
    }

    pub async fn create(
        &self,
        budget_id: BudgetId,
        input: &BudgetItemInput,
    ) -> BudgetwiseResult<BudgetItem> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let created: BudgetItem = self
            .api
            .post_json(&Self::items_path(budget_id), input)
            .await
            .map_err(|e| not_found_as(e, budget_id))?;
        self.budgets.invalidate()?;
        info!("Allocated {} in budget {}", created.allocation, budget_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        budget_id: BudgetId,
        item_id: BudgetItemId,
        input: &BudgetItemInput,
    ) -> BudgetwiseResult<BudgetItem> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let updated: BudgetItem = self
            .api
            .put_json(&format!("{}/{}", Self::items_path(budget_id), item_id), input)
            .await
            .map_err(|e| item_not_found_as(e, item_id))?;
        self.budgets.invalidate()?;
        info!("Updated budget item {}", item_id);
        Ok(updated)
    }

    pub async fn delete(&self, budget_id: BudgetId, item_id: BudgetItemId) -> BudgetwiseResult<()> {
        self.api
            .delete(&format!("{}/{}", Self::items_path(budget_id), item_id))
            .await
            .map_err(|e| item_not_found_as(e, item_id))?;
        self.budgets.invalidate()?;
        info!("Deleted budget item {}", item_id);
        Ok(())
    }

    /// Create the item for `input.category_id`, or update it if the budget has one
    pub async fn upsert(
        &self,
        budget: &Budget,
        input: &BudgetItemInput,
    ) -> BudgetwiseResult<BudgetItem> {
        match budget.item_for(input.category_id) {
            Some(existing) => self.update(budget.id, existing.id, input).await,
            None => self.create(budget.id, input).await,
        }
    }
}

fn not_found_as(err: BudgetwiseError, id: BudgetId) -> BudgetwiseError {
    if err.is_not_found() {
        BudgetwiseError::budget_not_found(id.to_string())
    } else {
        err
    }
}

fn item_not_found_as(err: BudgetwiseError, id: BudgetItemId) -> BudgetwiseError {
    if err.is_not_found() {
        BudgetwiseError::budget_item_not_found(id.to_string())
    } else {
        err
    }
}
