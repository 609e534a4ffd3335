//! Transactions and the views that list them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for querying transactions and changing their category
//! - The filter and sort rules shared by every transaction table
//! - View handlers for the transactions page and the category update endpoint

mod core;
mod table;
mod transactions_page;
mod update_endpoint;
mod view;

pub use core::{
    Transaction, TransactionBuilder, TransactionUpdate, create_transaction,
    create_transaction_table, get_all_transactions, get_transaction, get_transactions_in_range,
    update_transaction,
};
pub use table::{
    SortConfig, SortDirection, SortKey, TableFilter, categories_in, filter_and_sort, table_total,
};
pub use transactions_page::get_transactions_page;
pub use update_endpoint::update_transaction_category_endpoint;
pub use view::{empty_row, total_footer};
