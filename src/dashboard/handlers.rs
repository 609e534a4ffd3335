//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the chart and the transactions table
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::UNCATEGORIZED_LABEL,
    dashboard::{
        aggregation::{CategorySpending, aggregate_by_category, category_total},
        charts::{DashboardChart, chart_view, spending_chart, spending_chart_script},
    },
    database_id::CategoryId,
    date_filter::{DateFilter, DateRange, FilterScope, date_range_controls},
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, app_page, format_currency, link,
    },
    store::SqliteStore,
    timezone::local_today,
    transaction::{
        SortConfig, TableFilter, Transaction, empty_row, filter_and_sort,
        get_transactions_in_range, table_total, total_footer,
    },
};

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The category selected in the chart.
    pub category: Option<CategoryId>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    range: DateRange,
    spending: Vec<CategorySpending>,
    selected_category_id: Option<CategoryId>,
    rows: Vec<Transaction>,
    total: f64,
}

/// Display spending per category for the saved date range, and the
/// transactions in the selected category.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    // The store locks the connection itself, so read the range first.
    let store = SqliteStore::new(state.db_connection.clone());
    let range = DateFilter::new(
        &store,
        FilterScope::Dashboard,
        DateRange::current_month_to_date(today),
    )
    .load();

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_range(&range, &connection).inspect_err(|error| {
            tracing::error!("could not get transactions for {range:?}: {error}")
        })?
    };

    let data = build_dashboard_data(range, &transactions, query.category);

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(
    range: DateRange,
    transactions: &[Transaction],
    selected_category_id: Option<CategoryId>,
) -> DashboardData {
    let spending = aggregate_by_category(transactions);

    let filter = selected_category_id
        .map(TableFilter::for_category)
        .unwrap_or_default();
    let rows = filter_and_sort(transactions, &range, &filter, SortConfig::default());

    let selected_total = selected_category_id.map(|id| category_total(&spending, id));
    let total = table_total(&rows, selected_total);

    DashboardData {
        range,
        spending,
        selected_category_id,
        rows,
        total,
    }
}

fn dashboard_row(transaction: &Transaction) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(ref category_name) = transaction.category_name {
                    (category_name)
                } @else {
                    (UNCATEGORIZED_LABEL)
                }
            }
        }
    }
}

fn transactions_table(data: &DashboardData) -> Markup {
    html! {
        section class="w-full"
        {
            div class="flex items-center justify-between mb-2"
            {
                h3 class="text-lg font-semibold" { "Transactions" }

                @if data.selected_category_id.is_some() {
                    (link(endpoints::DASHBOARD_VIEW, "Show all"))
                }
            }

            div class="relative max-h-[400px] overflow-auto shadow-md sm:rounded-lg"
            {
                table class=(TABLE_STYLE) aria-label="transactions table"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-6 py-3" { "Date" }
                            th scope="col" class="px-6 py-3" { "Description" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class="px-6 py-3" { "Category" }
                        }
                    }

                    tbody
                    {
                        @for transaction in &data.rows {
                            (dashboard_row(transaction))
                        }

                        @if data.rows.is_empty() {
                            (empty_row("No transactions found matching the current filters"))
                        }
                    }

                    (total_footer(data.total))
                }
            }
        }
    }
}

/// Renders the dashboard page with the chart, date inputs and table.
fn dashboard_view(data: &DashboardData) -> Markup {
    let chart = DashboardChart {
        id: "spending-chart",
        options: spending_chart(&data.spending).to_string(),
    };
    let redirect_url = match data.selected_category_id {
        Some(category_id) => format!("{}?category={category_id}", endpoints::DASHBOARD_VIEW),
        None => endpoints::DASHBOARD_VIEW.to_owned(),
    };

    let content = html!(
        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-wrap items-end justify-between gap-4 mb-4"
            {
                h2 class="text-xl font-bold" { "Spending by Category" }

                (date_range_controls(FilterScope::Dashboard, &data.range, &redirect_url))
            }

            section id="charts" class="w-full mx-auto mb-4"
            {
                @if data.spending.is_empty() {
                    p class="p-4 rounded-lg bg-gray-100 dark:bg-gray-800"
                    {
                        "No category data available for the selected date range"
                    }
                } @else {
                    (chart_view(&chart))
                }
            }

            (transactions_table(data))
        }
    );

    let scripts = if data.spending.is_empty() {
        Vec::new()
    } else {
        let category_ids = data
            .spending
            .iter()
            .map(|category| category.category_id)
            .collect::<Vec<_>>();

        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            spending_chart_script(&chart, &category_ids, data.selected_category_id),
        ]
    };

    app_page("Dashboard", endpoints::DASHBOARD_VIEW, &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName, create_category},
        date_filter::FilterScope,
        db::initialize,
        store::{KeyValueStore, SqliteStore},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{Transaction, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn save_january(state: &DashboardState) {
        SqliteStore::new(state.db_connection.clone())
            .write_raw(
                FilterScope::Dashboard.storage_key(),
                r#"{"startDate":"2024-01-01","endDate":"2024-01-31"}"#,
            )
            .unwrap();
    }

    fn seed(state: &DashboardState) {
        let connection = state.db_connection.lock().unwrap();
        let food = create_category(
            Category::build(CategoryName::new_unchecked("Food")),
            &connection,
        )
        .unwrap();

        for (amount, day, description, category_id) in [
            (-40.0, date!(2024 - 01 - 05), "Groceries", Some(food.id)),
            (-10.0, date!(2024 - 01 - 06), "Takeaways", Some(food.id)),
            (250.0, date!(2024 - 01 - 07), "Pay", None),
            (-99.0, date!(2024 - 02 - 01), "Outside range", Some(food.id)),
        ] {
            create_transaction(
                Transaction::build(amount, day, description).category_id(category_id),
                &connection,
            )
            .unwrap();
        }
    }

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_transactions_in_saved_range() {
        let state = get_test_state();
        seed(&state);
        save_january(&state);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("#spending-chart").unwrap())
                .next()
                .is_some()
        );
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            ["Pay", "Takeaways", "Groceries"]
        );
        let footer = select_text(&html, "tfoot td");
        assert_eq!(footer[0], "$200.00");
    }

    #[tokio::test]
    async fn selected_category_uses_category_total() {
        let state = get_test_state();
        seed(&state);
        save_january(&state);

        let response =
            get_dashboard_page(State(state), Query(DashboardQuery { category: Some(1) }))
                .await
                .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            ["Takeaways", "Groceries"]
        );
        let footer = select_text(&html, "tfoot td");
        assert_eq!(footer[0], "$50.00");
        assert!(
            html.select(&Selector::parse("a[href='/dashboard']").unwrap())
                .any(|link| link.text().collect::<String>() == "Show all")
        );
    }

    #[tokio::test]
    async fn uncategorized_bucket_lists_uncategorized_transactions() {
        let state = get_test_state();
        seed(&state);
        save_january(&state);

        let response =
            get_dashboard_page(State(state), Query(DashboardQuery { category: Some(0) }))
                .await
                .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(select_text(&html, "tbody tr td:nth-child(2)"), ["Pay"]);
    }

    #[tokio::test]
    async fn empty_range_shows_placeholders() {
        let state = get_test_state();
        save_january(&state);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No category data available for the selected date range"));
        assert!(text.contains("No transactions found matching the current filters"));
        assert!(
            html.select(&Selector::parse("#spending-chart").unwrap())
                .next()
                .is_none()
        );
    }
}
