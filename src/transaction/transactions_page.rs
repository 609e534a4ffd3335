//! Defines the route handler for the page that displays transactions as a table.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{Category, CategoryName, get_all_categories},
    database_id::CategoryId,
    date_filter::{DateFilter, DateRange, FilterScope, date_range_controls},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_HEADER_STYLE,
        TABLE_STYLE, app_page,
    },
    store::SqliteStore,
    timezone::local_today,
};

use super::{
    Transaction,
    core::get_all_transactions,
    table::{
        SortConfig, SortDirection, SortKey, TableFilter, categories_in, filter_and_sort,
        table_total,
    },
    view::{empty_row, total_footer, transaction_row},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions and the saved date range.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The sort order as written in the query string.
///
/// Unlike [SortDirection], this can say that a column was explicitly unsorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionParam {
    Asc,
    Desc,
    None,
}

impl From<Option<SortDirection>> for DirectionParam {
    fn from(direction: Option<SortDirection>) -> Self {
        match direction {
            Some(SortDirection::Asc) => DirectionParam::Asc,
            Some(SortDirection::Desc) => DirectionParam::Desc,
            None => DirectionParam::None,
        }
    }
}

/// The query string for the transactions page.
///
/// The same struct is serialized to build links that keep the current
/// filters, e.g. the column header links.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DirectionParam>,
}

impl TransactionsQuery {
    pub fn filter(&self) -> TableFilter {
        TableFilter {
            description: self.description.trim().to_owned(),
            amount: self.amount.trim().to_owned(),
            category: self.category.trim().to_owned(),
        }
    }

    /// The sort requested by the query, the default sort if there is none.
    pub fn sort_config(&self) -> SortConfig {
        let Some(key) = self.sort else {
            return SortConfig::default();
        };

        let direction = match self.direction {
            Some(DirectionParam::Asc) | None => Some(SortDirection::Asc),
            Some(DirectionParam::Desc) => Some(SortDirection::Desc),
            Some(DirectionParam::None) => None,
        };

        SortConfig { key, direction }
    }

    /// The same query with the sort replaced by `sort`.
    pub fn with_sort(&self, sort: SortConfig) -> Self {
        Self {
            sort: Some(sort.key),
            direction: Some(sort.direction.into()),
            ..self.clone()
        }
    }

    /// The page URL for this query.
    pub fn to_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query_string) if !query_string.is_empty() => {
                format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW)
            }
            Ok(_) => endpoints::TRANSACTIONS_VIEW.to_owned(),
            Err(error) => {
                tracing::error!("Could not encode transactions query {self:?}: {error}");
                endpoints::TRANSACTIONS_VIEW.to_owned()
            }
        }
    }
}

struct TransactionsViewModel {
    /// The saved date range for this page.
    range: DateRange,
    /// The query that produced this page.
    query: TransactionsQuery,
    /// The active sort, derived from `query`.
    sort: SortConfig,
    /// Whether the database has any transactions at all.
    has_any_transactions: bool,
    /// The transactions left after filtering and sorting.
    rows: Vec<Transaction>,
    /// Options for the category filter.
    category_options: Vec<(CategoryId, CategoryName)>,
    /// Every category, for changing the category of a row.
    categories: Vec<Category>,
}

/// Render the transactions page with the saved date range and the filters
/// and sort from the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    // The store locks the connection itself, so read the range first.
    let store = SqliteStore::new(state.db_connection.clone());
    let range = DateFilter::new(
        &store,
        FilterScope::Transactions,
        DateRange::current_month_to_date(today),
    )
    .load();

    let (transactions, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
        let categories = get_all_categories(&connection)
            .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

        (transactions, categories)
    };

    let sort = query.sort_config();
    let rows = filter_and_sort(&transactions, &range, &query.filter(), sort);

    let model = TransactionsViewModel {
        range,
        sort,
        has_any_transactions: !transactions.is_empty(),
        rows,
        category_options: categories_in(&transactions),
        categories,
        query,
    };

    Ok(transactions_view(&model).into_response())
}

fn sort_indicator(sort: SortConfig, key: SortKey) -> &'static str {
    if sort.key != key {
        return "";
    }

    match sort.direction {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    }
}

fn sortable_header(model: &TransactionsViewModel, key: SortKey, title: &str) -> Markup {
    let url = model.query.with_sort(model.sort.request(key)).to_url();

    html! {
        th scope="col" class="px-6 py-3"
        {
            a href=(url) class="hover:underline" data-sort-key=(title)
            {
                (title) (sort_indicator(model.sort, key))
            }
        }
    }
}

fn filter_form(model: &TransactionsViewModel) -> Markup {
    let query = &model.query;

    html! {
        form
            id="transaction-filters"
            hx-get=(endpoints::TRANSACTIONS_VIEW)
            hx-trigger="input changed delay:300ms, change from:#category-filter"
            hx-target="#transactions-content"
            hx-select="#transactions-content"
            hx-swap="outerHTML"
            hx-push-url="true"
            class="grid grid-cols-1 gap-4 mb-4 md:grid-cols-3"
        {
            @if let Some(sort) = query.sort {
                input type="hidden" name="sort" value=(sort_param(sort));
            }

            @if let Some(direction) = query.direction {
                input type="hidden" name="direction" value=(direction_param(direction));
            }

            div
            {
                label for="description-filter" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    id="description-filter"
                    type="search"
                    name="description"
                    value=(query.description)
                    placeholder="Filter by description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount-filter" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount-filter"
                    type="search"
                    name="amount"
                    value=(query.amount)
                    placeholder="Filter by amount"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category-filter" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category-filter" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[query.category.is_empty()] { "All categories" }

                    @for (id, name) in &model.category_options {
                        @let value = id.to_string();
                        option value=(value) selected[query.category == value] { (name) }
                    }
                }
            }
        }
    }
}

fn sort_param(key: SortKey) -> &'static str {
    match key {
        SortKey::Date => "date",
        SortKey::Description => "description",
        SortKey::Amount => "amount",
        SortKey::Category => "category",
    }
}

fn direction_param(direction: DirectionParam) -> &'static str {
    match direction {
        DirectionParam::Asc => "asc",
        DirectionParam::Desc => "desc",
        DirectionParam::None => "none",
    }
}

/// The region the filter form swaps. The date controls live here so their
/// `redirect_url` follows the filters currently applied.
fn transactions_content(model: &TransactionsViewModel, redirect_url: &str) -> Markup {
    html! {
        div id="transactions-content"
        {
            (date_range_controls(FilterScope::Transactions, &model.range, redirect_url))
            (transactions_table(model))
        }
    }
}

fn transactions_table(model: &TransactionsViewModel) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        (sortable_header(model, SortKey::Date, "Date"))
                        (sortable_header(model, SortKey::Description, "Description"))
                        (sortable_header(model, SortKey::Amount, "Amount"))
                        (sortable_header(model, SortKey::Category, "Category"))
                    }
                }

                tbody
                {
                    @for transaction in &model.rows {
                        (transaction_row(transaction, &model.categories))
                    }

                    @if model.rows.is_empty() {
                        (empty_row("No transactions found"))
                    }
                }

                (total_footer(table_total(&model.rows, None)))
            }
        }
    }
}

fn transactions_view(model: &TransactionsViewModel) -> Markup {
    let redirect_url = model.query.to_url();

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Transactions" }

            @if model.has_any_transactions {
                (filter_form(model))
                (transactions_content(model, &redirect_url))
            } @else {
                (date_range_controls(FilterScope::Transactions, &model.range, &redirect_url))
                p class="text-gray-500 dark:text-gray-400" { "No transactions found" }
            }
        }
    };

    app_page("Transactions", endpoints::TRANSACTIONS_VIEW, &[], &content)
}
