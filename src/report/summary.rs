//! Per category totals for the reports page.

use rusqlite::{Connection, Row, params};

use crate::{
    Error,
    category::{CategoryName, UNCATEGORIZED_ID},
    database_id::CategoryId,
    date_filter::DateRange,
};

/// The number of transactions and their total in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// The category ID, [UNCATEGORIZED_ID] for transactions without a category.
    pub category_id: CategoryId,
    /// The category name, `None` for transactions without a category.
    pub category_name: Option<CategoryName>,
    /// The sum of the signed transaction amounts.
    pub total_amount: f64,
    pub transaction_count: i64,
}

/// Summarise the transactions in `range` by category.
///
/// Only categories with at least one transaction in the range are listed,
/// sorted by name with uncategorized transactions last.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_category_summaries(
    range: &DateRange,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    connection
        .prepare(
            "SELECT COALESCE(c.id, ?3), c.name, SUM(t.amount), COUNT(t.id)
            FROM \"transaction\" t
            LEFT JOIN category c ON c.id = t.category_id
            WHERE (?1 IS NULL OR t.date >= ?1) AND (?2 IS NULL OR t.date <= ?2)
            GROUP BY COALESCE(c.id, ?3)
            ORDER BY c.name IS NULL, c.name",
        )?
        .query_map(
            params![range.start, range.end, UNCATEGORIZED_ID],
            map_summary_row,
        )?
        .map(|maybe_summary| maybe_summary.map_err(Error::from))
        .collect()
}

fn map_summary_row(row: &Row) -> Result<CategorySummary, rusqlite::Error> {
    let category_name: Option<String> = row.get(1)?;

    Ok(CategorySummary {
        category_id: row.get(0)?,
        category_name: category_name.map(|name| CategoryName::new_unchecked(&name)),
        total_amount: row.get(2)?,
        transaction_count: row.get(3)?,
    })
}
