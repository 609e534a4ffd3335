//! Grouping transactions by category for the spending chart.

use std::collections::HashMap;

use crate::{
    category::{UNCATEGORIZED_ID, UNCATEGORIZED_LABEL},
    database_id::CategoryId,
    transaction::Transaction,
};

/// How much was spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// The category ID, [UNCATEGORIZED_ID] for transactions without a category.
    pub category_id: CategoryId,
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub label: String,
    /// The sum of the absolute transaction amounts.
    pub total: f64,
}

/// Sum the absolute amounts of `transactions` per category.
///
/// Income and expenses both count towards a category's size. Categories are
/// listed in the order they first appear in `transactions`.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategorySpending> {
    let mut spending: Vec<CategorySpending> = Vec::new();
    let mut index_by_id: HashMap<CategoryId, usize> = HashMap::new();

    for transaction in transactions {
        let category_id = transaction.category_id.unwrap_or(UNCATEGORIZED_ID);

        let index = *index_by_id.entry(category_id).or_insert_with(|| {
            spending.push(CategorySpending {
                category_id,
                label: transaction
                    .category_name
                    .as_ref()
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_owned()),
                total: 0.0,
            });
            spending.len() - 1
        });

        spending[index].total += transaction.amount.abs();
    }

    spending
}

/// The total for `category_id`, zero if nothing was spent in it.
pub fn category_total(spending: &[CategorySpending], category_id: CategoryId) -> f64 {
    spending
        .iter()
        .find(|category| category.category_id == category_id)
        .map(|category| category.total)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{category::CategoryName, transaction::Transaction};

    use super::{CategorySpending, aggregate_by_category, category_total};

    fn create_test_transaction(amount: f64, category: Option<(i64, &str)>) -> Transaction {
        Transaction {
            id: 1,
            amount,
            date: date!(2024 - 01 - 01),
            description: "test".to_owned(),
            category_id: category.map(|(id, _)| id),
            category_name: category.map(|(_, name)| CategoryName::new_unchecked(name)),
        }
    }

    #[test]
    fn sums_absolute_amounts_per_category() {
        let transactions = [
            create_test_transaction(-50.0, Some((2, "Food"))),
            create_test_transaction(100.0, None),
            create_test_transaction(-25.5, Some((2, "Food"))),
            create_test_transaction(-10.0, None),
        ];

        let got = aggregate_by_category(&transactions);

        assert_eq!(
            got,
            [
                CategorySpending {
                    category_id: 2,
                    label: "Food".to_owned(),
                    total: 75.5,
                },
                CategorySpending {
                    category_id: 0,
                    label: "Uncategorized".to_owned(),
                    total: 110.0,
                },
            ]
        );
    }

    #[test]
    fn handles_empty_input() {
        assert!(aggregate_by_category(&[]).is_empty());
    }

    #[test]
    fn missing_category_total_is_zero() {
        let spending = aggregate_by_category(&[create_test_transaction(-5.0, Some((1, "Fun")))]);

        assert_eq!(category_total(&spending, 1), 5.0);
        assert_eq!(category_total(&spending, 9), 0.0);
    }
}
