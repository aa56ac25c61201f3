//! Generative-AI assistance
//!
//! The service proxies every task at `POST /ai/{task}` with a body of
//! `{prompt, schema, input}` and answers with JSON matching `schema`. Answers
//! are never trusted as-is: amounts are clamped, unknown category ids dropped.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::analytics::{Series, SeriesKey};
use crate::api::ApiClient;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{
    BudgetItemInput, Category, CategoryId, Money, TransactionGroupInput, TransactionInput,
};

const SUGGEST_BUDGET_PROMPT: &str = "You are a budgeting assistant. Given the user's categories, \
their monthly income and their average monthly spending per category, propose a monthly \
allocation for each expense category. Allocations must be non-negative and should not exceed \
the income in total. Use only the category ids provided. Give a one-sentence rationale per \
allocation.";

const MAP_CATEGORIES_PROMPT: &str = "Map each source category label to the single most \
appropriate target category. Use only the target category ids provided. Omit labels that fit \
no target category.";

const EXTRACT_RECEIPT_PROMPT: &str = "Read the attached receipt image. Return the merchant name, \
the purchase date if printed (YYYY-MM-DD), and every line item with its price. Assign a category \
id from the provided list when one clearly fits, otherwise leave it null.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    SuggestBudget,
    MapCategories,
    ExtractReceipt,
}

impl AiTask {
    pub fn name(self) -> &'static str {
        match self {
            Self::SuggestBudget => "suggest_budget",
            Self::MapCategories => "map_categories",
            Self::ExtractReceipt => "extract_receipt",
        }
    }

    pub fn path(self) -> String {
        format!("/ai/{}", self.name())
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Self::SuggestBudget => SUGGEST_BUDGET_PROMPT,
            Self::MapCategories => MAP_CATEGORIES_PROMPT,
            Self::ExtractReceipt => EXTRACT_RECEIPT_PROMPT,
        }
    }

    /// JSON schema the answer must follow
    pub fn schema(self) -> Value {
        match self {
            Self::SuggestBudget => json!({
                "type": "object",
                "properties": {
                    "allocations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "category_id": {"type": "string"},
                                "amount": {"type": "number", "minimum": 0},
                                "rationale": {"type": "string"}
                            },
                            "required": ["category_id", "amount"]
                        }
                    }
                },
                "required": ["allocations"]
            }),
            Self::MapCategories => json!({
                "type": "object",
                "properties": {
                    "pairs": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "from": {"type": "string"},
                                "to": {"type": "string"}
                            },
                            "required": ["from", "to"]
                        }
                    }
                },
                "required": ["pairs"]
            }),
            Self::ExtractReceipt => json!({
                "type": "object",
                "properties": {
                    "merchant": {"type": "string"},
                    "date": {"type": ["string", "null"], "format": "date"},
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "amount": {"type": "number"},
                                "category_id": {"type": ["string", "null"]}
                            },
                            "required": ["name", "amount"]
                        }
                    }
                },
                "required": ["merchant", "items"]
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct AiRequest<'a, I: Serialize> {
    prompt: &'a str,
    schema: Value,
    input: I,
}

/// A category as described to the model
#[derive(Debug, Clone, Serialize)]
struct CategoryBrief<'a> {
    id: CategoryId,
    name: &'a str,
    is_income: bool,
}

impl<'a> From<&'a Category> for CategoryBrief<'a> {
    fn from(category: &'a Category) -> Self {
        Self {
            id: category.id,
            name: &category.name,
            is_income: category.is_income,
        }
    }
}

/// Average monthly spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category_id: CategoryId,
    pub name: String,
    pub monthly_average: Money,
}

impl CategorySpending {
    /// Averages from a monthly expense series, as positive amounts
    pub fn from_monthly_expenses(series: &Series, categories: &[Category]) -> Vec<Self> {
        if series.is_empty() {
            return Vec::new();
        }
        let months = series.len() as i64;
        categories
            .iter()
            .filter(|c| !c.is_income)
            .filter_map(|c| {
                let total = series.total_for(SeriesKey::Category(c.id));
                if total.is_zero() {
                    return None;
                }
                Some(Self {
                    category_id: c.id,
                    name: c.name.clone(),
                    monthly_average: Money::from_cents(total.cents().abs() / months),
                })
            })
            .collect()
    }
}

/// Reads a category id the model may have invented; anything that is not a
/// UUID string becomes `None`
fn lenient_category_id<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(|s| s.trim().parse().ok()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedAllocation {
    pub category_id: CategoryId,
    pub amount: Money,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetSuggestion {
    pub allocations: Vec<SuggestedAllocation>,
}

/// Allocation as answered by the model, before checking
#[derive(Debug, Deserialize)]
struct AllocationAnswer {
    #[serde(default, deserialize_with = "lenient_category_id")]
    category_id: Option<CategoryId>,
    amount: Money,
    #[serde(default)]
    rationale: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionAnswer {
    #[serde(default)]
    allocations: Vec<AllocationAnswer>,
}

impl SuggestionAnswer {
    /// Clamp negative amounts and drop ids not among `categories`
    fn sanitized(self, categories: &[Category]) -> BudgetSuggestion {
        let known: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();
        let allocations = self
            .allocations
            .into_iter()
            .filter_map(|a| {
                let category_id = a.category_id.filter(|id| known.contains(id))?;
                Some(SuggestedAllocation {
                    category_id,
                    amount: a.amount.non_negative(),
                    rationale: a.rationale,
                })
            })
            .collect();
        BudgetSuggestion { allocations }
    }
}

impl BudgetSuggestion {
    pub fn total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// Budget item requests for every suggested allocation
    pub fn to_item_inputs(&self) -> Vec<BudgetItemInput> {
        self.allocations
            .iter()
            .map(|a| BudgetItemInput {
                category_id: a.category_id,
                allocation: a.amount,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPair {
    pub from: String,
    pub to: CategoryId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryMapping {
    pub pairs: Vec<CategoryPair>,
}

#[derive(Debug, Deserialize)]
struct PairAnswer {
    from: String,
    #[serde(default, deserialize_with = "lenient_category_id")]
    to: Option<CategoryId>,
}

#[derive(Debug, Deserialize)]
struct MappingAnswer {
    #[serde(default)]
    pairs: Vec<PairAnswer>,
}

impl MappingAnswer {
    /// Keep pairs whose source was asked about and whose target exists
    fn sanitized(self, sources: &[String], targets: &[Category]) -> CategoryMapping {
        let known: HashSet<CategoryId> = targets.iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();
        let pairs = self
            .pairs
            .into_iter()
            .filter_map(|p| {
                let to = p.to.filter(|id| known.contains(id))?;
                Some(CategoryPair { from: p.from, to })
            })
            .filter(|p| sources.contains(&p.from))
            .filter(|p| seen.insert(p.from.clone()))
            .collect();
        CategoryMapping { pairs }
    }
}

impl CategoryMapping {
    pub fn to_map(&self) -> HashMap<String, CategoryId> {
        self.pairs.iter().map(|p| (p.from.clone(), p.to)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub amount: Money,
    #[serde(default, deserialize_with = "lenient_category_id")]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptExtraction {
    pub merchant: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

impl ReceiptExtraction {
    /// Clamp negative prices and unset unknown category ids
    pub fn sanitized(self, categories: &[Category]) -> Self {
        let known: HashSet<CategoryId> = categories.iter().map(|c| c.id).collect();
        let items = self
            .items
            .into_iter()
            .map(|item| ReceiptItem {
                amount: item.amount.non_negative(),
                category_id: item.category_id.filter(|id| known.contains(id)),
                name: item.name,
            })
            .collect();
        Self { items, ..self }
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Group request for the receipt; `fallback_date` is used when none was read
    pub fn to_group_input(&self, fallback_date: NaiveDate) -> TransactionGroupInput {
        let merchant = self.merchant.trim();
        TransactionGroupInput {
            name: if merchant.is_empty() {
                "Receipt".to_string()
            } else {
                merchant.to_string()
            },
            date: self.date.unwrap_or(fallback_date),
            transactions: self
                .items
                .iter()
                .map(|item| TransactionInput {
                    name: item.name.clone(),
                    amount: item.amount,
                    category_id: item.category_id,
                    date: None,
                    external_id: None,
                })
                .collect(),
        }
    }
}

/// Client for the `/ai/*` proxy endpoints
pub struct AiClient {
    api: ApiClient,
}

impl AiClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn run<I, T>(&self, task: AiTask, input: I) -> BudgetwiseResult<T>
    where
        I: Serialize,
        T: serde::de::DeserializeOwned,
    {
        let request = AiRequest {
            prompt: task.prompt(),
            schema: task.schema(),
            input,
        };
        debug!("Running AI task {}", task.name());

        self.api
            .post_json(&task.path(), &request)
            .await
            .map_err(|e| match e {
                BudgetwiseError::Api { status, message } if status >= 500 => {
                    BudgetwiseError::Ai(message)
                }
                BudgetwiseError::Json(message) => {
                    BudgetwiseError::Ai(format!("Unexpected answer from {}: {}", task.name(), message))
                }
                other => other,
            })
    }

    pub async fn suggest_budget(
        &self,
        categories: &[Category],
        monthly_income: Money,
        history: &[CategorySpending],
    ) -> BudgetwiseResult<BudgetSuggestion> {
        let briefs: Vec<CategoryBrief<'_>> = categories
            .iter()
            .filter(|c| !c.legacy)
            .map(CategoryBrief::from)
            .collect();
        let input = json!({
            "categories": briefs,
            "monthly_income": monthly_income,
            "history": history,
        });

        let answer: SuggestionAnswer = self.run(AiTask::SuggestBudget, input).await?;
        let suggestion = answer.sanitized(categories);
        info!("AI suggested {} allocation(s)", suggestion.allocations.len());
        Ok(suggestion)
    }

    pub async fn map_categories(
        &self,
        sources: &[String],
        targets: &[Category],
    ) -> BudgetwiseResult<CategoryMapping> {
        if sources.is_empty() {
            return Ok(CategoryMapping::default());
        }
        let briefs: Vec<CategoryBrief<'_>> = targets.iter().map(CategoryBrief::from).collect();
        let input = json!({ "source": sources, "target": briefs });

        let answer: MappingAnswer = self.run(AiTask::MapCategories, input).await?;
        Ok(answer.sanitized(sources, targets))
    }

    pub async fn extract_receipt(
        &self,
        image_base64: &str,
        categories: &[Category],
    ) -> BudgetwiseResult<ReceiptExtraction> {
        if image_base64.trim().is_empty() {
            return Err(BudgetwiseError::Validation("Receipt image is empty".into()));
        }
        let briefs: Vec<CategoryBrief<'_>> = categories
            .iter()
            .filter(|c| !c.is_income && !c.legacy)
            .map(CategoryBrief::from)
            .collect();
        let input = json!({ "image_base64": image_base64, "categories": briefs });

        let receipt: ReceiptExtraction = self.run(AiTask::ExtractReceipt, input).await?;
        Ok(receipt.sanitized(categories))
    }
}
