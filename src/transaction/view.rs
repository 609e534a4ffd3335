//! Markup shared by the tables that list transactions.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{Category, UNCATEGORIZED_LABEL},
    endpoints::{self, format_endpoint},
    html::{CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::Transaction,
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
pub const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The number of columns in a transaction row.
pub const TRANSACTION_COLUMNS: usize = 4;

const CATEGORY_SELECT_STYLE: &str = "mt-1 block w-full p-1 rounded text-xs \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600";

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

/// Shorten long descriptions, returning the text to display and the full
/// description to use as a tooltip if it was shortened.
pub fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

fn category_select(transaction: &Transaction, categories: &[Category]) -> Markup {
    let endpoint = format_endpoint(endpoints::TRANSACTION_CATEGORY, transaction.id);

    html! {
        select
            name="category_id"
            aria-label="Change category"
            hx-put=(endpoint)
            hx-trigger="change"
            hx-target="closest tr"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class=(CATEGORY_SELECT_STYLE)
        {
            option value="" selected[transaction.category_id.is_none()] { (UNCATEGORIZED_LABEL) }

            @for category in categories {
                option
                    value=(category.id)
                    selected[transaction.category_id == Some(category.id)]
                {
                    (category.name)
                }
            }
        }
    }
}

/// A table row for `transaction` with a select for changing its category.
pub fn transaction_row(transaction: &Transaction, categories: &[Category]) -> Markup {
    let amount_str = format_currency(transaction.amount);
    let amount_class = amount_class(transaction.amount);
    let (description, tooltip) = format_description(&transaction.description);

    html! {
        tr
            id={ "transaction-" (transaction.id) }
            class=(TABLE_ROW_STYLE)
            data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class={ "px-6 py-4 text-right " (amount_class) } { (amount_str) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(ref category_name) = transaction.category_name {
                    span class=(CATEGORY_BADGE_STYLE) { (category_name) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { (UNCATEGORIZED_LABEL) }
                }

                (category_select(transaction, categories))
            }
        }
    }
}

/// The row shown in place of the table body when there is nothing to list.
pub fn empty_row(message: &str) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td colspan=(TRANSACTION_COLUMNS) class="px-6 py-4 text-center" { (message) }
        }
    }
}

/// A table footer with the total of the listed amounts.
pub fn total_footer(total: f64) -> Markup {
    html! {
        tfoot
        {
            tr class="font-semibold text-gray-900 dark:text-white"
            {
                th scope="row" colspan="2" class=(TABLE_CELL_STYLE) { "Total:" }
                td class={ "px-6 py-4 text-right " (amount_class(total)) }
                {
                    (format_currency(total))
                }
                td {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName},
        transaction::Transaction,
    };

    use super::{MAX_DESCRIPTION_GRAPHEMES, format_description, transaction_row};

    fn groceries() -> Category {
        Category {
            id: 3,
            name: CategoryName::new_unchecked("Groceries"),
            description: None,
            icon: None,
            color: None,
        }
    }

    fn get_transaction(category: Option<&Category>) -> Transaction {
        Transaction {
            id: 7,
            amount: -12.5,
            date: date!(2024 - 01 - 02),
            description: "Corner store".to_owned(),
            category_id: category.map(|category| category.id),
            category_name: category.map(|category| category.name.clone()),
        }
    }

    #[test]
    fn short_descriptions_are_kept() {
        let (text, tooltip) = format_description("Coffee");

        assert_eq!(text, "Coffee");
        assert_eq!(tooltip, None);
    }

    #[test]
    fn long_descriptions_are_truncated_by_grapheme() {
        let description = "👍🏽".repeat(40);

        let (text, tooltip) = format_description(&description);

        assert_eq!(text, format!("{}...", "👍🏽".repeat(MAX_DESCRIPTION_GRAPHEMES - 3)));
        assert_eq!(tooltip, Some(description.as_str()));
    }

    #[test]
    fn row_shows_category_and_select() {
        let category = groceries();
        let markup = transaction_row(&get_transaction(Some(&category)), &[category.clone()]);

        let html = Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));
        let row = html
            .select(&Selector::parse("tr").unwrap())
            .next()
            .expect("row missing");
        let text = row.text().collect::<String>();
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("-$12.50"));

        let select = row
            .select(&Selector::parse("select").unwrap())
            .next()
            .expect("category select missing");
        assert_eq!(
            select.value().attr("hx-put"),
            Some("/api/transactions/7/category")
        );
        assert_eq!(select.value().attr("hx-target"), Some("closest tr"));

        let selected = row
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(selected, ["3"]);
    }

    #[test]
    fn uncategorized_row_selects_empty_option() {
        let markup = transaction_row(&get_transaction(None), &[groceries()]);

        let html = Html::parse_fragment(&format!("<table>{}</table>", markup.into_string()));
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(selected, [""]);
    }
}
