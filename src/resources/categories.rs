//! Categories resource

use log::info;

use super::cache::EntityCache;
use crate::api::ApiClient;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{Category, CategoryId, CategoryInput};

const PATH: &str = "/categories";

/// Cached CRUD access to `/categories`
pub struct CategoryResource {
    api: ApiClient,
    cache: EntityCache<CategoryId, Category>,
}

impl CategoryResource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: EntityCache::new(),
        }
    }

    /// All categories, sorted by name
    pub async fn list(&self) -> BudgetwiseResult<Vec<Category>> {
        let mut categories = match self.cache.all()? {
            Some(cached) => cached,
            None => {
                let fetched: Vec<Category> = self.api.get_json(PATH).await?;
                self.cache.fill(fetched.iter().cloned(), |c| c.id)?;
                fetched
            }
        };
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(categories)
    }

    /// Categories offered when assigning new transactions
    pub async fn list_active(&self) -> BudgetwiseResult<Vec<Category>> {
        Ok(self.list().await?.into_iter().filter(|c| !c.legacy).collect())
    }

    pub async fn get(&self, id: CategoryId) -> BudgetwiseResult<Category> {
        if let Some(category) = self.cache.get(id)? {
            return Ok(category);
        }

        let category: Category = self
            .api
            .get_json(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.put(id, category.clone())?;
        Ok(category)
    }

    /// Find a category by name (case-insensitive), full id or short id
    pub async fn find(&self, identifier: &str) -> BudgetwiseResult<Category> {
        let identifier = identifier.trim();
        let categories = self.list().await?;
        let wanted = identifier.to_lowercase();
        let parsed = identifier.parse::<CategoryId>().ok();

        categories
            .into_iter()
            .find(|c| {
                c.name.to_lowercase() == wanted
                    || Some(c.id) == parsed
                    || c.id.short() == identifier
            })
            .ok_or_else(|| BudgetwiseError::category_not_found(identifier))
    }

    pub async fn create(&self, input: &CategoryInput) -> BudgetwiseResult<Category> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let created: Category = self.api.post_json(PATH, input).await?;
        self.cache.invalidate()?;
        info!("Created category {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(&self, id: CategoryId, input: &CategoryInput) -> BudgetwiseResult<Category> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let updated: Category = self
            .api
            .put_json(&format!("{}/{}", PATH, id), input)
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Updated category {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: CategoryId) -> BudgetwiseResult<()> {
        self.api
            .delete(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Deleted category {}", id);
        Ok(())
    }
}

fn not_found_as(err: BudgetwiseError, id: CategoryId) -> BudgetwiseError {
    if err.is_not_found() {
        BudgetwiseError::category_not_found(id.to_string())
    } else {
        err
    }
}
