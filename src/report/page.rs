//! Defines the route handler for the reports page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::UNCATEGORIZED_LABEL,
    date_filter::{DateFilter, DateRange, FilterScope, date_range_controls},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TABLE_STYLE, app_page, format_currency,
    },
    store::SqliteStore,
    timezone::local_today,
};

use super::summary::{CategorySummary, get_category_summaries};

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsPageState {
    /// The database connection for reading transactions and the saved date range.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render a table of transaction totals per category for the saved date range.
pub async fn get_reports_page(State(state): State<ReportsPageState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    // The store locks the connection itself, so read the range first.
    let store = SqliteStore::new(state.db_connection.clone());
    let range = DateFilter::new(
        &store,
        FilterScope::Reports,
        DateRange::current_month_to_date(today),
    )
    .load();

    let summaries = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_category_summaries(&range, &connection).inspect_err(|error| {
            tracing::error!("could not get category summaries for {range:?}: {error}")
        })?
    };

    Ok(reports_view(&range, &summaries).into_response())
}

fn summary_row(summary: &CategorySummary) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(ref category_name) = summary.category_name {
                    (category_name)
                } @else {
                    (UNCATEGORIZED_LABEL)
                }
            }
            td class="px-6 py-4 text-right" { (summary.transaction_count) }
            td class="px-6 py-4 text-right" { (format_currency(summary.total_amount)) }
        }
    }
}

fn reports_view(range: &DateRange, summaries: &[CategorySummary]) -> Markup {
    let reset_endpoint = format_endpoint(endpoints::DATE_FILTER, FilterScope::Reports.as_path_segment());

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-wrap items-end justify-between gap-4 mb-4"
            {
                h2 class="text-xl font-bold" { "Transaction Reports" }

                div class="flex flex-wrap items-end gap-4"
                {
                    (date_range_controls(FilterScope::Reports, range, endpoints::REPORTS_VIEW))

                    button
                        type="button"
                        hx-delete=(reset_endpoint)
                        hx-target-error="#alert-container"
                        class={ (BUTTON_SECONDARY_STYLE) " mb-4" }
                    {
                        "Reset to Current Month"
                    }
                }
            }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-6 py-3" { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Transaction Count" }
                            th scope="col" class="px-6 py-3 text-right" { "Total Amount" }
                        }
                    }

                    tbody
                    {
                        @for summary in summaries {
                            (summary_row(summary))
                        }

                        @if summaries.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="3" class="px-6 py-4 text-center"
                                {
                                    "No transactions found for the selected date range"
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    app_page("Reports", endpoints::REPORTS_VIEW, &[], &content)
}
