//! Filtering and sorting for transaction tables.
//!
//! Everything here is pure: the same transactions, range, filter and sort
//! always produce the same rows in the same order.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{
    category::{CategoryName, UNCATEGORIZED_ID},
    database_id::CategoryId,
    date_filter::DateRange,
    transaction::Transaction,
};

/// The text filters applied to a transaction table.
///
/// An empty field does not filter anything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableFilter {
    /// Case-insensitive substring of the description.
    pub description: String,
    /// Substring of the amount written as a plain decimal number.
    pub amount: String,
    /// The category ID as a string, "0" selects uncategorized transactions.
    pub category: String,
}

impl TableFilter {
    /// A filter that only keeps transactions in the given category.
    pub fn for_category(category_id: CategoryId) -> Self {
        Self {
            category: category_id.to_string(),
            ..Default::default()
        }
    }

    /// Whether `transaction` passes the filter and falls inside `range`.
    pub fn matches(&self, transaction: &Transaction, range: &DateRange) -> bool {
        if !range.contains(transaction.date) {
            return false;
        }

        if !self.description.is_empty()
            && !transaction
                .description
                .to_lowercase()
                .contains(&self.description.to_lowercase())
        {
            return false;
        }

        if !self.amount.is_empty() && !amount_string(transaction.amount).contains(&self.amount) {
            return false;
        }

        self.category.is_empty()
            || transaction.category_id.unwrap_or(UNCATEGORIZED_ID).to_string() == self.category
    }
}

/// Write `amount` as the shortest decimal that reads back as the same number,
/// without a trailing ".0", e.g. "100", "-50", "12.5".
pub fn amount_string(amount: f64) -> String {
    amount.to_string()
}

/// The columns a transaction table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Description,
    Amount,
    Category,
}

/// The order of a sorted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Which column a table is sorted by, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// The column last selected for sorting.
    pub key: SortKey,
    /// The sort order, `None` keeps the filtered order.
    pub direction: Option<SortDirection>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: Some(SortDirection::Desc),
        }
    }
}

impl SortConfig {
    /// The sort that results from the user selecting the column `key`.
    ///
    /// Selecting a new column sorts it ascending. Selecting the current column
    /// cycles ascending, descending, then unsorted.
    pub fn request(self, key: SortKey) -> SortConfig {
        if key != self.key {
            return SortConfig {
                key,
                direction: Some(SortDirection::Asc),
            };
        }

        let direction = match self.direction {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        SortConfig { key, direction }
    }
}

fn category_sort_name(transaction: &Transaction) -> &str {
    transaction
        .category_name
        .as_ref()
        .map(|name| name.as_ref())
        .unwrap_or("")
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
        SortKey::Category => category_sort_name(a).cmp(category_sort_name(b)),
    }
}

/// Keep the transactions that match `filter` and `range`, then sort them.
///
/// The sort is stable, so rows that compare equal keep their input order.
pub fn filter_and_sort(
    transactions: &[Transaction],
    range: &DateRange,
    filter: &TableFilter,
    sort: SortConfig,
) -> Vec<Transaction> {
    let mut rows = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction, range))
        .cloned()
        .collect::<Vec<_>>();

    match sort.direction {
        Some(SortDirection::Asc) => rows.sort_by(|a, b| compare(a, b, sort.key)),
        Some(SortDirection::Desc) => rows.sort_by(|a, b| compare(b, a, sort.key)),
        None => {}
    }

    rows
}

/// The total shown in a table footer.
///
/// When a category is selected the precomputed total for that category is
/// used, otherwise the amounts of `rows` are summed.
pub fn table_total(rows: &[Transaction], selected_category_total: Option<f64>) -> f64 {
    selected_category_total.unwrap_or_else(|| rows.iter().map(|row| row.amount).sum())
}

/// The categories used by `transactions`, one per name, sorted by name.
pub fn categories_in(transactions: &[Transaction]) -> Vec<(CategoryId, CategoryName)> {
    let by_name = transactions
        .iter()
        .filter_map(|transaction| {
            transaction
                .category_id
                .zip(transaction.category_name.clone())
                .map(|(id, name)| (name, id))
        })
        .fold(BTreeMap::new(), |mut by_name, (name, id)| {
            by_name.entry(name).or_insert(id);
            by_name
        });

    by_name.into_iter().map(|(name, id)| (id, name)).collect()
}
