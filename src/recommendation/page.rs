//! Defines the recommendations page and the endpoint that asks the agent for
//! recommendations.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    date_filter::{DateFilter, DateRange, FilterScope, date_range_controls},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, app_page, loading_spinner},
    store::SqliteStore,
    timezone::local_today,
};

use super::{
    client::{AgentClient, Recommendation},
    sequence::RequestSequencer,
};

/// The state needed for the recommendations page and endpoint.
#[derive(Debug, Clone)]
pub struct RecommendationsState {
    /// The database connection that backs the saved date range.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub agent_client: AgentClient,
    /// Orders overlapping requests so only the newest result is shown.
    pub request_sequencer: Arc<RequestSequencer>,
}

impl FromRef<AppState> for RecommendationsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            agent_client: state.agent_client.clone(),
            request_sequencer: state.request_sequencer.clone(),
        }
    }
}

fn load_range(state: &RecommendationsState) -> Result<DateRange, Error> {
    let today = local_today(&state.local_timezone)?;
    let store = SqliteStore::new(state.db_connection.clone());

    Ok(DateFilter::new(
        &store,
        FilterScope::Recommendations,
        DateRange::current_month_to_date(today),
    )
    .load())
}

/// Render the recommendations page.
///
/// Recommendations are only requested once the user asks for them.
pub async fn get_recommendations_page(
    State(state): State<RecommendationsState>,
) -> Result<Response, Error> {
    let range = load_range(&state)?;

    Ok(recommendations_page_view(&range).into_response())
}

/// Ask the agent for recommendations on the saved date range and render them.
///
/// Responds with `204 No Content` if a newer request was made while waiting
/// on the agent, so that the newer result is not replaced.
pub async fn get_recommendations_endpoint(State(state): State<RecommendationsState>) -> Response {
    let ticket = state.request_sequencer.issue();

    let range = match load_range(&state) {
        Ok(range) => range,
        Err(error) => return error_response(error),
    };

    let request = state.agent_client.request_for(&range);
    let result = state.agent_client.get_recommendations(&request).await;

    if !state.request_sequencer.is_latest(ticket) {
        tracing::debug!("dropping recommendations for superseded request {ticket:?}");
        return StatusCode::NO_CONTENT.into_response();
    }

    match result {
        Ok(response) => recommendations_view(&response.recommendations).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: Error) -> Response {
    let message = error.to_string();
    let (status_code, _) = error.into_status_and_alert();

    (status_code, error_banner(&message)).into_response()
}

fn error_banner(message: &str) -> Markup {
    html! {
        div
            role="alert"
            class="p-4 mb-4 text-red-800 border border-red-300 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        {
            "Error getting recommendations: " (message)
        }
    }
}

fn recommendations_view(recommendations: &[Recommendation]) -> Markup {
    html! {
        @if recommendations.is_empty() {
            p class="text-gray-500 dark:text-gray-400"
            {
                "No recommendations for the selected date range"
            }
        } @else {
            h3 class="text-lg font-semibold mb-4" { "Here are your savings recommendations:" }

            @for recommendation in recommendations {
                article class="mb-6" data-recommendation="true"
                {
                    h4 class="font-medium mb-2" { (recommendation.description) }

                    ul class="flex flex-col gap-2"
                    {
                        @for action in &recommendation.actions {
                            li
                                class="p-2 text-sm text-center rounded-lg border \
                                    border-gray-200 dark:border-gray-700"
                            {
                                (action)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn recommendations_page_view(range: &DateRange) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex flex-wrap items-end gap-4 mb-4"
            {
                h2 class="text-xl font-bold mb-4" { "Savings Recommendations" }

                (date_range_controls(
                    FilterScope::Recommendations,
                    range,
                    endpoints::RECOMMENDATIONS_VIEW,
                ))

                form
                    hx-post=(endpoints::RECOMMENDATIONS_API)
                    hx-target="#recommendations-result"
                    hx-target-error="#recommendations-result"
                    hx-swap="innerHTML"
                    hx-sync="this:replace"
                    hx-indicator="#indicator"
                    class="mb-4"
                {
                    button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="htmx-indicator" { (loading_spinner()) }
                        "Get Recommendations"
                    }
                }
            }

            section id="recommendations-result" aria-live="polite" {}
        }
    };

    app_page(
        "Recommendations",
        endpoints::RECOMMENDATIONS_VIEW,
        &[],
        &content,
    )
}
