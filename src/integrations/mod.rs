//! Server-proxied third-party services
//!
//! Bank aggregation and the language model are reached only through the
//! budgeting API; these modules hold the request/response contracts.

pub mod ai;
pub mod bank;

pub use ai::{
    AiClient, AiTask, BudgetSuggestion, CategoryMapping, CategorySpending, ReceiptExtraction,
};
pub use bank::{
    BankClient, BankTransaction, ImportPlan, LinkToken, Reconciliation, SyncChange,
    SyncCursorStore, SyncOutcome, SyncPage,
};
