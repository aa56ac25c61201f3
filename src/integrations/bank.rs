//! Bank account linking and transaction sync
//!
//! The aggregator is only reached through the service's `/bank/*` proxy
//! endpoints. The service keeps the aggregator access token; the client
//! holds nothing but the sync cursor.
//!
//! Amounts follow the aggregator's convention: positive is money leaving the
//! account, negative is money coming in.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::sleep;

use crate::api::ApiClient;
use crate::config::{BudgetwisePaths, Settings};
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{
    Category, CategoryId, Money, TransactionGroup, TransactionGroupId, TransactionGroupInput,
    TransactionId, TransactionInput,
};
use crate::storage::{read_json_optional, write_json_atomic};

/// Token the bank-link widget is opened with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
}

/// Acknowledgement of a public token exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    #[serde(default)]
    pub item_id: Option<String>,
}

/// A transaction as reported by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub transaction_id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
    /// Aggregator category label, e.g. "FOOD_AND_DRINK"
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub pending: bool,
}

impl BankTransaction {
    pub fn display_name(&self) -> &str {
        self.merchant_name.as_deref().unwrap_or(&self.name)
    }

    /// Money coming into the account
    pub fn is_inflow(&self) -> bool {
        self.amount.is_negative()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedTransaction {
    pub transaction_id: String,
}

/// One page of the cursor-based sync endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPage {
    #[serde(default)]
    pub added: Vec<BankTransaction>,
    #[serde(default)]
    pub modified: Vec<BankTransaction>,
    #[serde(default)]
    pub removed: Vec<RemovedTransaction>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    /// False while the aggregator is still preparing data for this cursor
    #[serde(default = "default_ready")]
    pub ready: bool,
}

fn default_ready() -> bool {
    true
}

/// Everything collected by a full sync
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub added: Vec<BankTransaction>,
    pub modified: Vec<BankTransaction>,
    pub removed: Vec<RemovedTransaction>,
    /// Cursor to resume from next time
    pub cursor: Option<String>,
    pub pages: usize,
}

impl SyncOutcome {
    /// Fold a page in; later pages win over earlier ones for the same id
    fn absorb(&mut self, page: SyncPage) {
        self.added.extend(page.added);
        for changed in page.modified {
            let same = |t: &BankTransaction| t.transaction_id == changed.transaction_id;
            if let Some(i) = self.added.iter().position(same) {
                self.added[i] = changed;
            } else if let Some(i) = self.modified.iter().position(same) {
                self.modified[i] = changed;
            } else {
                self.modified.push(changed);
            }
        }
        for gone in page.removed {
            let before = self.added.len();
            self.added.retain(|t| t.transaction_id != gone.transaction_id);
            self.modified.retain(|t| t.transaction_id != gone.transaction_id);
            if self.added.len() == before {
                self.removed.push(gone);
            }
        }
        if page.next_cursor.is_some() {
            self.cursor = page.next_cursor;
        }
        self.pages += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// One transaction group per settled added transaction
    ///
    /// `category_map` maps aggregator labels to local categories. Outflows
    /// keep an expense category or stay uncategorized. Inflows are only
    /// imported when they map to an income category; the rest are returned
    /// in `skipped_inflows` so they never count as spending. Pending
    /// transactions are skipped because the aggregator re-sends them once
    /// they settle.
    pub fn into_transaction_groups(
        &self,
        category_map: &HashMap<String, CategoryId>,
        categories: &[Category],
    ) -> ImportPlan {
        let income: HashSet<CategoryId> = categories
            .iter()
            .filter(|c| c.is_income)
            .map(|c| c.id)
            .collect();
        let mut plan = ImportPlan::default();

        for t in self.added.iter().filter(|t| !t.pending) {
            let mapped = t
                .category
                .as_ref()
                .and_then(|label| category_map.get(label))
                .copied();
            let category_id = if t.is_inflow() {
                match mapped.filter(|id| income.contains(id)) {
                    Some(id) => Some(id),
                    None => {
                        plan.skipped_inflows.push(t.clone());
                        continue;
                    }
                }
            } else {
                mapped.filter(|id| !income.contains(id))
            };
            plan.groups.push(TransactionGroupInput {
                name: t.display_name().to_string(),
                date: t.date,
                transactions: vec![TransactionInput {
                    name: t.name.clone(),
                    amount: t.amount.abs(),
                    category_id,
                    date: None,
                    external_id: Some(t.transaction_id.clone()),
                }],
            });
        }
        plan
    }

    /// Updates and deletions for transactions imported by earlier syncs
    ///
    /// Matches on the bank transaction id stored with each imported
    /// transaction. A removal that would leave its group empty deletes the
    /// group. Manually chosen categories survive updates.
    pub fn reconcile(&self, existing: &[TransactionGroup]) -> Reconciliation {
        let imported = |id: &str| {
            existing.iter().find_map(|group| {
                group
                    .transactions
                    .iter()
                    .find(|t| t.external_id.as_deref() == Some(id))
                    .map(|t| (group, t))
            })
        };
        let mut result = Reconciliation::default();

        for changed in self.modified.iter().filter(|t| !t.pending) {
            match imported(&changed.transaction_id) {
                Some((group, current)) => result.changes.push(SyncChange::Update {
                    group_id: group.id,
                    transaction_id: current.id,
                    input: TransactionInput {
                        name: changed.name.clone(),
                        amount: changed.amount.abs(),
                        category_id: current.category_id,
                        date: (changed.date != group.date).then_some(changed.date),
                        external_id: Some(changed.transaction_id.clone()),
                    },
                }),
                None => result.unmatched += 1,
            }
        }

        for gone in &self.removed {
            match imported(&gone.transaction_id) {
                Some((group, _)) if group.transactions.len() == 1 => {
                    result.changes.push(SyncChange::DeleteGroup(group.id))
                }
                Some((group, current)) => result.changes.push(SyncChange::DeleteTransaction {
                    group_id: group.id,
                    transaction_id: current.id,
                }),
                None => result.unmatched += 1,
            }
        }
        result
    }

    /// Distinct aggregator category labels among added transactions
    pub fn category_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .added
            .iter()
            .filter_map(|t| t.category.clone())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

/// Groups to create from the added transactions of a sync
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub groups: Vec<TransactionGroupInput>,
    /// Deposits with no income category to land in
    pub skipped_inflows: Vec<BankTransaction>,
}

impl ImportPlan {
    /// Drop groups whose bank transaction was already imported
    pub fn without_existing(mut self, existing: &[TransactionGroup]) -> Self {
        let known: HashSet<&str> = existing
            .iter()
            .flat_map(|g| g.transactions.iter())
            .filter_map(|t| t.external_id.as_deref())
            .collect();
        self.groups.retain(|g| {
            !g.transactions
                .iter()
                .filter_map(|t| t.external_id.as_deref())
                .any(|id| known.contains(id))
        });
        self
    }
}

/// One change to apply to previously imported data
#[derive(Debug, Clone, PartialEq)]
pub enum SyncChange {
    Update {
        group_id: TransactionGroupId,
        transaction_id: TransactionId,
        input: TransactionInput,
    },
    DeleteTransaction {
        group_id: TransactionGroupId,
        transaction_id: TransactionId,
    },
    DeleteGroup(TransactionGroupId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub changes: Vec<SyncChange>,
    /// Modified or removed bank transactions that were never imported
    pub unmatched: usize,
}

/// Client for the `/bank/*` proxy endpoints
pub struct BankClient {
    api: ApiClient,
    retry_delay: Duration,
    max_attempts: u32,
}

impl BankClient {
    pub fn new(api: ApiClient, retry_delay: Duration, max_attempts: u32) -> Self {
        Self {
            api,
            retry_delay,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_settings(api: ApiClient, settings: &Settings) -> Self {
        Self::new(
            api,
            Duration::from_millis(settings.sync_retry_delay_ms),
            settings.sync_max_attempts,
        )
    }

    pub async fn create_link_token(&self) -> BudgetwiseResult<LinkToken> {
        let token: LinkToken = self.api.post_json("/bank/link-token", &json!({})).await?;
        info!("Created bank link token");
        Ok(token)
    }

    pub async fn exchange_public_token(&self, public_token: &str) -> BudgetwiseResult<ExchangeResult> {
        if public_token.trim().is_empty() {
            return Err(BudgetwiseError::Validation("Public token cannot be empty".into()));
        }
        let result: ExchangeResult = self
            .api
            .post_json("/bank/exchange", &json!({ "public_token": public_token.trim() }))
            .await?;
        info!("Linked bank item {}", result.item_id.as_deref().unwrap_or("(unknown)"));
        Ok(result)
    }

    pub async fn sync_page(&self, cursor: Option<&str>) -> BudgetwiseResult<SyncPage> {
        self.api
            .post_json("/bank/sync", &json!({ "cursor": cursor }))
            .await
    }

    /// Pull every page after `start_cursor`
    ///
    /// While the aggregator reports `ready == false` the same cursor is polled
    /// again after the fixed delay; after `max_attempts` such polls the sync
    /// fails.
    pub async fn sync_all(&self, start_cursor: Option<String>) -> BudgetwiseResult<SyncOutcome> {
        let mut outcome = SyncOutcome {
            cursor: start_cursor,
            ..Default::default()
        };
        let mut waiting = 0u32;

        loop {
            let page = self.sync_page(outcome.cursor.as_deref()).await?;

            if !page.ready {
                waiting += 1;
                if waiting >= self.max_attempts {
                    return Err(BudgetwiseError::Sync(format!(
                        "Bank data still not ready after {} attempts",
                        waiting
                    )));
                }
                warn!(
                    "Bank data not ready, retrying in {}ms ({}/{})",
                    self.retry_delay.as_millis(),
                    waiting,
                    self.max_attempts
                );
                sleep(self.retry_delay).await;
                continue;
            }

            waiting = 0;
            let has_more = page.has_more;
            let advanced = page
                .next_cursor
                .as_ref()
                .is_some_and(|next| Some(next) != outcome.cursor.as_ref());
            if has_more && !advanced {
                return Err(BudgetwiseError::Sync(
                    "Bank reported more pages without a new cursor".into(),
                ));
            }
            debug!(
                "Sync page: {} added, {} modified, {} removed",
                page.added.len(),
                page.modified.len(),
                page.removed.len()
            );
            outcome.absorb(page);

            if !has_more {
                break;
            }
        }

        info!(
            "Bank sync finished: {} added, {} modified, {} removed over {} page(s)",
            outcome.added.len(),
            outcome.modified.len(),
            outcome.removed.len(),
            outcome.pages
        );
        Ok(outcome)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCursor {
    cursor: String,
    synced_at: DateTime<Utc>,
}

/// Last sync cursor, kept in `data/sync_cursor.json`
#[derive(Debug, Clone)]
pub struct SyncCursorStore {
    path: PathBuf,
}

impl SyncCursorStore {
    pub fn new(paths: &BudgetwisePaths) -> Self {
        Self {
            path: paths.sync_cursor_file(),
        }
    }

    pub fn load(&self) -> BudgetwiseResult<Option<String>> {
        let stored: Option<StoredCursor> = read_json_optional(&self.path)?;
        Ok(stored.map(|s| s.cursor))
    }

    pub fn save(&self, cursor: &str) -> BudgetwiseResult<()> {
        write_json_atomic(
            &self.path,
            &StoredCursor {
                cursor: cursor.to_string(),
                synced_at: Utc::now(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{split_streams, CategoryLookup};
    use crate::api::testing::{logged_in_client, ScriptedTransport};
    use crate::models::Transaction;
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn txn(id: &str, amount: f64, category: Option<&str>, pending: bool) -> Value {
        json!({
            "transaction_id": id,
            "name": format!("Txn {}", id),
            "amount": amount,
            "date": "2025-10-01",
            "category": category,
            "pending": pending,
        })
    }

    fn bank(transport: Arc<ScriptedTransport>, max_attempts: u32) -> BankClient {
        BankClient::new(
            logged_in_client(transport),
            Duration::from_millis(2000),
            max_attempts,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_all_follows_cursor_and_waits_when_not_ready() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!({"ready": false}))
                .respond_json(
                    200,
                    json!({"added": [txn("a", 12.5, None, false)], "next_cursor": "c1", "has_more": true}),
                )
                .respond_json(
                    200,
                    json!({
                        "added": [txn("b", -100.0, Some("INCOME"), false)],
                        "removed": [{"transaction_id": "old"}],
                        "next_cursor": "c2",
                        "has_more": false
                    }),
                ),
        );
        let client = bank(transport.clone(), 5);

        let outcome = client.sync_all(Some("c0".into())).await.unwrap();
        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.cursor.as_deref(), Some("c2"));
        assert_eq!(outcome.pages, 2);

        let bodies: Vec<Value> = transport
            .requests()
            .into_iter()
            .map(|r| r.body.unwrap())
            .collect();
        assert_eq!(bodies[0]["cursor"], "c0");
        assert_eq!(bodies[1]["cursor"], "c0");
        assert_eq!(bodies[2]["cursor"], "c1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_gives_up_after_attempt_cap() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!({"ready": false}))
                .respond_json(200, json!({"ready": false}))
                .respond_json(200, json!({"ready": false})),
        );
        let client = bank(transport.clone(), 3);

        let err = client.sync_all(None).await.unwrap_err();
        assert!(matches!(err, BudgetwiseError::Sync(_)));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let transport = Arc::new(
            ScriptedTransport::new().respond_json(200, json!({"next_cursor": "c9", "has_more": false})),
        );
        let outcome = bank(transport, 3).sync_all(None).await.unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.cursor.as_deref(), Some("c9"));
    }

    #[tokio::test]
    async fn test_link_and_exchange() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!({"link_token": "link-sandbox-1"}))
                .respond_json(200, json!({"item_id": "item-1"})),
        );
        let client = bank(transport.clone(), 3);

        assert_eq!(client.create_link_token().await.unwrap().link_token, "link-sandbox-1");
        let result = client.exchange_public_token(" public-1 ").await.unwrap();
        assert_eq!(result.item_id.as_deref(), Some("item-1"));
        assert_eq!(
            transport.requests()[1].body,
            Some(json!({"public_token": "public-1"}))
        );
        assert!(client.exchange_public_token("").await.unwrap_err().is_validation());
    }

    fn outcome_of(page: Value) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        outcome.absorb(serde_json::from_value(page).unwrap());
        outcome
    }

    /// What the service would hand back for a created group
    fn stored(input: &TransactionGroupInput) -> TransactionGroup {
        input.transactions.iter().fold(
            TransactionGroup::new(input.name.clone(), input.date),
            |group, t| {
                let mut txn = Transaction::new(t.name.clone(), t.amount, t.category_id);
                txn.external_id = t.external_id.clone();
                group.with_transaction(txn)
            },
        )
    }

    #[test]
    fn test_into_transaction_groups() {
        let food = Category::new("Food", false);
        let salary = Category::new("Salary", true);
        let categories = vec![food.clone(), salary.clone()];
        let outcome = outcome_of(json!({
            "added": [
                txn("a", 12.5, Some("FOOD_AND_DRINK"), false),
                txn("b", -100.0, Some("INCOME"), false),
                txn("c", 3.0, None, true),
                txn("d", 40.0, Some("INCOME"), false),
            ],
            "has_more": false
        }));

        let map = HashMap::from([
            ("FOOD_AND_DRINK".to_string(), food.id),
            ("INCOME".to_string(), salary.id),
        ]);
        let plan = outcome.into_transaction_groups(&map, &categories);
        assert_eq!(plan.groups.len(), 3);
        assert!(plan.skipped_inflows.is_empty());

        let food_txn = &plan.groups[0].transactions[0];
        assert_eq!(food_txn.category_id, Some(food.id));
        assert_eq!(food_txn.amount.cents(), 1250);
        assert_eq!(food_txn.external_id.as_deref(), Some("a"));

        let pay = &plan.groups[1].transactions[0];
        assert_eq!(pay.amount.cents(), 10000);
        assert_eq!(pay.category_id, Some(salary.id));

        // an outflow never lands in an income category
        assert_eq!(plan.groups[2].transactions[0].category_id, None);
        assert_eq!(outcome.category_labels(), vec!["FOOD_AND_DRINK", "INCOME"]);
    }

    #[test]
    fn test_unmapped_deposit_is_not_spending() {
        let food = Category::new("Food", false);
        let categories = vec![food.clone()];
        let outcome = outcome_of(json!({
            "added": [
                txn("pay", -2500.0, Some("TRANSFER_IN"), false),
                txn("lunch", 15.0, Some("FOOD_AND_DRINK"), false),
                txn("refund", -20.0, Some("FOOD_AND_DRINK"), false),
            ],
            "has_more": false
        }));
        let map = HashMap::from([("FOOD_AND_DRINK".to_string(), food.id)]);

        let plan = outcome.into_transaction_groups(&map, &categories);
        assert_eq!(plan.groups.len(), 1);
        let skipped: Vec<&str> = plan
            .skipped_inflows
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(skipped, vec!["pay", "refund"]);

        let groups: Vec<TransactionGroup> = plan.groups.iter().map(stored).collect();
        let streams = split_streams(&groups, &CategoryLookup::new(&categories));
        assert_eq!(streams.total_expenses().cents(), -1500);
        assert_eq!(streams.total_income(), Money::zero());
    }

    #[test]
    fn test_later_pages_replace_earlier_entries() {
        let mut outcome = outcome_of(json!({
            "added": [txn("a", 10.0, None, false), txn("b", 5.0, None, false)],
            "next_cursor": "c1",
            "has_more": true
        }));
        outcome.absorb(
            serde_json::from_value(json!({
                "modified": [txn("a", 11.0, None, false), txn("z", 1.0, None, false)],
                "removed": [{"transaction_id": "b"}, {"transaction_id": "old"}],
                "next_cursor": "c2",
                "has_more": false
            }))
            .unwrap(),
        );

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.added[0].amount.cents(), 1100);
        assert_eq!(outcome.modified.len(), 1);
        assert_eq!(outcome.modified[0].transaction_id, "z");
        assert_eq!(outcome.removed, vec![RemovedTransaction { transaction_id: "old".into() }]);
    }

    #[tokio::test]
    async fn test_sync_fails_when_cursor_does_not_advance() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!({"added": [txn("a", 1.0, None, false)], "has_more": true}))
                .respond_json(200, json!({"added": [txn("a", 1.0, None, false)], "has_more": true})),
        );
        let client = bank(transport.clone(), 3);

        let err = client.sync_all(Some("c0".into())).await.unwrap_err();
        assert!(matches!(err, BudgetwiseError::Sync(_)));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_fails_when_cursor_repeats() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond_json(200, json!({"next_cursor": "c0", "has_more": true})),
        );
        let err = bank(transport, 3).sync_all(Some("c0".into())).await.unwrap_err();
        assert!(matches!(err, BudgetwiseError::Sync(_)));
    }

    #[test]
    fn test_reconcile_updates_and_removes_imported() {
        let food = Category::new("Food", false);
        let categories = vec![food.clone()];
        let first = outcome_of(json!({
            "added": [txn("a", 10.0, None, false), txn("b", 4.0, None, false)],
            "has_more": false
        }));
        let plan = first.into_transaction_groups(&HashMap::new(), &categories);
        let mut existing: Vec<TransactionGroup> = plan.groups.iter().map(stored).collect();
        // recategorised by hand after the import
        existing[0].transactions[0].category_id = Some(food.id);
        // a manual line added next to an imported one
        existing[1]
            .transactions
            .push(Transaction::new("tip", Money::from_cents(100), None));

        let later = outcome_of(json!({
            "modified": [txn("a", 12.0, None, false), txn("never", 1.0, None, false)],
            "removed": [{"transaction_id": "b"}],
            "has_more": false
        }));
        let result = later.reconcile(&existing);
        assert_eq!(result.unmatched, 1);
        assert_eq!(result.changes.len(), 2);

        match &result.changes[0] {
            SyncChange::Update { group_id, transaction_id, input } => {
                assert_eq!(*group_id, existing[0].id);
                assert_eq!(*transaction_id, existing[0].transactions[0].id);
                assert_eq!(input.amount.cents(), 1200);
                assert_eq!(input.category_id, Some(food.id));
                assert_eq!(input.date, None);
            }
            other => panic!("unexpected change: {:?}", other),
        }
        assert_eq!(
            result.changes[1],
            SyncChange::DeleteTransaction {
                group_id: existing[1].id,
                transaction_id: existing[1].transactions[0].id,
            }
        );

        existing[1].transactions.pop();
        let result = later.reconcile(&existing);
        assert_eq!(result.changes[1], SyncChange::DeleteGroup(existing[1].id));
    }

    #[test]
    fn test_import_skips_already_imported() {
        let outcome = outcome_of(json!({
            "added": [txn("a", 10.0, None, false), txn("b", 4.0, None, false)],
            "has_more": false
        }));
        let plan = outcome.into_transaction_groups(&HashMap::new(), &[]);
        let existing = vec![stored(&plan.groups[0])];

        let plan = plan.without_existing(&existing);
        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].transactions[0].external_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_cursor_store() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = SyncCursorStore::new(&paths);

        assert_eq!(store.load().unwrap(), None);
        store.save("cursor-42").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("cursor-42"));
    }
}
