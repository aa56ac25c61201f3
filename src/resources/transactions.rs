//! Transaction groups and transactions resources
//!
//! Transactions are only reachable through their group
//! (`/transaction-groups/{id}/transactions`); their mutations invalidate the
//! group cache.

use std::sync::Arc;

use chrono::NaiveDate;
use log::info;

use super::cache::EntityCache;
use crate::api::ApiClient;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{
    Transaction, TransactionGroup, TransactionGroupId, TransactionGroupInput, TransactionId,
    TransactionInput,
};

const PATH: &str = "/transaction-groups";

type GroupCache = EntityCache<TransactionGroupId, TransactionGroup>;

/// Cached CRUD access to `/transaction-groups`
pub struct TransactionGroupResource {
    api: ApiClient,
    cache: Arc<GroupCache>,
}

impl TransactionGroupResource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Arc::new(EntityCache::new()),
        }
    }

    /// Transaction resource sharing this resource's cache
    pub fn transactions(&self) -> TransactionResource {
        TransactionResource {
            api: self.api.clone(),
            groups: Arc::clone(&self.cache),
        }
    }

    /// All groups, newest first
    pub async fn list(&self) -> BudgetwiseResult<Vec<TransactionGroup>> {
        let mut groups = match self.cache.all()? {
            Some(cached) => cached,
            None => {
                let fetched: Vec<TransactionGroup> = self.api.get_json(PATH).await?;
                self.cache.fill(fetched.iter().cloned(), |g| g.id)?;
                fetched
            }
        };
        groups.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
        Ok(groups)
    }

    /// Groups dated within `start..=end`
    pub async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BudgetwiseResult<Vec<TransactionGroup>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|g| g.date >= start && g.date <= end)
            .collect())
    }

    pub async fn get(&self, id: TransactionGroupId) -> BudgetwiseResult<TransactionGroup> {
        if let Some(group) = self.cache.get(id)? {
            return Ok(group);
        }

        let group: TransactionGroup = self
            .api
            .get_json(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.put(id, group.clone())?;
        Ok(group)
    }

    /// Find a group by full or short id
    pub async fn find(&self, identifier: &str) -> BudgetwiseResult<TransactionGroup> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionGroupId>() {
            return self.get(id).await;
        }

        self.list()
            .await?
            .into_iter()
            .find(|g| g.id.short() == identifier)
            .ok_or_else(|| BudgetwiseError::group_not_found(identifier))
    }

    pub async fn create(&self, input: &TransactionGroupInput) -> BudgetwiseResult<TransactionGroup> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let created: TransactionGroup = self.api.post_json(PATH, input).await?;
        self.cache.invalidate()?;
        info!(
            "Created transaction group {} with {} transaction(s)",
            created.name,
            created.transactions.len()
        );
        Ok(created)
    }

    /// Create several groups, e.g. after a bank sync
    pub async fn create_many(
        &self,
        inputs: &[TransactionGroupInput],
    ) -> BudgetwiseResult<Vec<TransactionGroup>> {
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(self.create(input).await?);
        }
        Ok(created)
    }

    pub async fn update(
        &self,
        id: TransactionGroupId,
        input: &TransactionGroupInput,
    ) -> BudgetwiseResult<TransactionGroup> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let updated: TransactionGroup = self
            .api
            .put_json(&format!("{}/{}", PATH, id), input)
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Updated transaction group {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: TransactionGroupId) -> BudgetwiseResult<()> {
        self.api
            .delete(&format!("{}/{}", PATH, id))
            .await
            .map_err(|e| not_found_as(e, id))?;
        self.cache.invalidate()?;
        info!("Deleted transaction group {}", id);
        Ok(())
    }
}

/// Create/update/delete under `/transaction-groups/{id}/transactions`
pub struct TransactionResource {
    api: ApiClient,
    groups: Arc<GroupCache>,
}

impl TransactionResource {
    fn transactions_path(group_id: TransactionGroupId) -> String {
        format!("{}/{}/transactions", PATH, group_id)
    }

    pub async fn create(
        &self,
        group_id: TransactionGroupId,
        input: &TransactionInput,
    ) -> BudgetwiseResult<Transaction> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let created: Transaction = self
            .api
            .post_json(&Self::transactions_path(group_id), input)
            .await
            .map_err(|e| not_found_as(e, group_id))?;
        self.groups.invalidate()?;
        info!("Added transaction {} to group {}", created.name, group_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        group_id: TransactionGroupId,
        id: TransactionId,
        input: &TransactionInput,
    ) -> BudgetwiseResult<Transaction> {
        input
            .validate()
            .map_err(|e| BudgetwiseError::Validation(e.to_string()))?;

        let updated: Transaction = self
            .api
            .put_json(&format!("{}/{}", Self::transactions_path(group_id), id), input)
            .await
            .map_err(|e| transaction_not_found_as(e, id))?;
        self.groups.invalidate()?;
        info!("Updated transaction {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, group_id: TransactionGroupId, id: TransactionId) -> BudgetwiseResult<()> {
        self.api
            .delete(&format!("{}/{}", Self::transactions_path(group_id), id))
            .await
            .map_err(|e| transaction_not_found_as(e, id))?;
        self.groups.invalidate()?;
        info!("Deleted transaction {}", id);
        Ok(())
    }
}

fn not_found_as(err: BudgetwiseError, id: TransactionGroupId) -> BudgetwiseError {
    if err.is_not_found() {
        BudgetwiseError::group_not_found(id.to_string())
    } else {
        err
    }
}

fn transaction_not_found_as(err: BudgetwiseError, id: TransactionId) -> BudgetwiseError {
    if err.is_not_found() {
        BudgetwiseError::transaction_not_found(id.to_string())
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{logged_in_client, ScriptedTransport};
    use crate::models::Money;
    use serde_json::json;

    fn group_json(id: TransactionGroupId, name: &str, date: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "date": date,
            "transactions": [
                {"id": TransactionId::new(), "name": "line", "amount": "12.50", "category_id": null}
            ]
        })
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first_and_filtered() {
        let transport = Arc::new(ScriptedTransport::new().respond_json(
            200,
            json!([
                group_json(TransactionGroupId::new(), "Older", "2025-01-05"),
                group_json(TransactionGroupId::new(), "Newer", "2025-03-01"),
            ]),
        ));
        let resource = TransactionGroupResource::new(logged_in_client(transport));

        let groups = resource.list().await.unwrap();
        assert_eq!(groups[0].name, "Newer");
        assert_eq!(groups[1].transactions[0].amount.cents(), 1250);

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let january = resource.list_between(start, end).await.unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].name, "Older");
    }

    #[tokio::test]
    async fn test_transaction_mutation_invalidates_groups() {
        let group_id = TransactionGroupId::new();
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!([group_json(group_id, "Shop", "2025-02-01")]))
                .respond_json(
                    201,
                    json!({"id": TransactionId::new(), "name": "Milk", "amount": 2.5}),
                )
                .respond_json(200, json!([group_json(group_id, "Shop", "2025-02-01")])),
        );
        let groups = TransactionGroupResource::new(logged_in_client(transport.clone()));
        let transactions = groups.transactions();

        groups.list().await.unwrap();
        let input = TransactionInput {
            name: "Milk".into(),
            amount: Money::from_cents(250),
            category_id: None,
            date: None,
            external_id: None,
        };
        let created = transactions.create(group_id, &input).await.unwrap();
        assert_eq!(created.amount.cents(), 250);
        groups.list().await.unwrap();

        assert_eq!(transport.calls().len(), 3);
        assert_eq!(transport.calls()[1], format!("POST /transaction-groups/{}/transactions", group_id));
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let groups = TransactionGroupResource::new(logged_in_client(transport.clone()));
        let input = TransactionGroupInput {
            name: "Refund".into(),
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            transactions: vec![TransactionInput {
                name: "x".into(),
                amount: Money::from_cents(-100),
                category_id: None,
                date: None,
                external_id: None,
            }],
        };
        assert!(groups.create(&input).await.unwrap_err().is_validation());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_group() {
        let id = TransactionGroupId::new();
        let transport = Arc::new(ScriptedTransport::new().respond(404, ""));
        let groups = TransactionGroupResource::new(logged_in_client(transport));
        let err = groups.delete(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Transaction group not found: {}", id));
    }
}
