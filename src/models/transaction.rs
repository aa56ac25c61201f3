//! Transaction and TransactionGroup models
//!
//! A transaction group is one dated bundle (a receipt, a bank import) holding
//! one or more transactions. Amounts are stored as positive magnitudes; the
//! category decides whether a transaction adds to or subtracts from totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionGroupId, TransactionId};
use super::money::Money;

/// A single line in a transaction group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub name: String,

    /// Magnitude of the transaction
    pub amount: Money,

    /// Uncategorised transactions count as expenses
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Overrides the group date when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Id of the bank transaction this was imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Transaction {
    pub fn new(name: impl Into<String>, amount: Money, category_id: Option<CategoryId>) -> Self {
        Self {
            id: TransactionId::new(),
            name: name.into(),
            amount,
            category_id,
            date: None,
            external_id: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Contribution to totals: positive for income, negative for spending
    pub fn signed_amount(&self, is_income: bool) -> Money {
        if is_income {
            self.amount
        } else {
            -self.amount
        }
    }

    /// The date used for bucketing, falling back to the group's date
    pub fn effective_date(&self, group_date: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(group_date)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.amount)
    }
}

/// A dated bundle of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub id: TransactionGroupId,

    pub name: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl TransactionGroup {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: TransactionGroupId::new(),
            name: name.into(),
            date,
            transactions: Vec::new(),
        }
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Sum of magnitudes, regardless of category
    pub fn gross_total(&self) -> Money {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

impl fmt::Display for TransactionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.date)
    }
}

/// Request body for creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub name: String,
    pub amount: Money,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.name.trim().is_empty() {
            return Err(TransactionValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl From<&Transaction> for TransactionInput {
    fn from(transaction: &Transaction) -> Self {
        Self {
            name: transaction.name.clone(),
            amount: transaction.amount,
            category_id: transaction.category_id,
            date: transaction.date,
            external_id: transaction.external_id.clone(),
        }
    }
}

/// Request body for creating or updating a transaction group
///
/// Transactions may be created together with their group in one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionGroupInput {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub transactions: Vec<TransactionInput>,
}

impl TransactionGroupInput {
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.name.trim().is_empty() {
            return Err(TransactionValidationError::EmptyName);
        }
        self.transactions.iter().try_for_each(|t| t.validate())
    }
}

impl From<&TransactionGroup> for TransactionGroupInput {
    fn from(group: &TransactionGroup) -> Self {
        Self {
            name: group.name.clone(),
            date: group.date,
            transactions: group.transactions.iter().map(TransactionInput::from).collect(),
        }
    }
}

/// Validation errors for transactions and groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyName,
    NegativeAmount,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NegativeAmount => {
                write!(f, "Amount must be positive; the category sets the direction")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
