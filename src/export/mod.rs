//! Export of chart data and transactions
//!
//! CSV only; the files open directly in a spreadsheet.

pub mod csv;

pub use self::csv::{
    export_merged_csv, export_savings_csv, export_series_csv, export_transactions_csv,
};
