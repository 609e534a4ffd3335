//! Route handlers for editing and resetting a page's saved date range.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    date_filter::{DateFilter, DateRange, FilterScope, parse_date},
    endpoints,
    store::SqliteStore,
    timezone::local_today,
};

/// The state needed to edit saved date ranges.
#[derive(Debug, Clone)]
pub struct DateFilterState {
    /// The database connection that backs the key-value store.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DateFilterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Which side of the range the user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBound {
    Start,
    End,
}

/// Form data sent when one of the date inputs changes.
#[derive(Debug, Deserialize)]
pub struct DateFilterForm {
    /// The side of the range that changed.
    pub edited: DateBound,
    /// The new date as YYYY-MM-DD.
    pub date: String,
    /// Where to send the user afterwards, must be a path on this site.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Save a new start or end date for `scope` and redirect back to the page.
pub async fn update_date_filter_endpoint(
    State(state): State<DateFilterState>,
    Path(scope): Path<FilterScope>,
    Form(form): Form<DateFilterForm>,
) -> Response {
    let date = match parse_date(&form.date) {
        Ok(date) => date,
        Err(error) => {
            tracing::debug!("rejected date filter edit for {scope:?}: {error}");
            return error.into_alert_response();
        }
    };

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let store = SqliteStore::new(state.db_connection.clone());
    let filter = DateFilter::new(&store, scope, DateRange::current_month_to_date(today));

    let result = match form.edited {
        DateBound::Start => filter.set_start(date),
        DateBound::End => filter.set_end(date),
    };

    if let Err(error) = result {
        tracing::error!("could not save date filter for {scope:?}: {error}");
        return error.into_alert_response();
    }

    let redirect_url = local_redirect(form.redirect_url.as_deref(), scope_page(scope));
    (HxRedirect(redirect_url), StatusCode::OK).into_response()
}

/// Forget the saved date range for `scope` and redirect back to the page.
pub async fn reset_date_filter_endpoint(
    State(state): State<DateFilterState>,
    Path(scope): Path<FilterScope>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let store = SqliteStore::new(state.db_connection.clone());
    let filter = DateFilter::new(&store, scope, DateRange::current_month_to_date(today));

    if let Err(error) = filter.reset() {
        tracing::error!("could not reset date filter for {scope:?}: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(scope_page(scope).to_owned()), StatusCode::OK).into_response()
}

fn scope_page(scope: FilterScope) -> &'static str {
    match scope {
        FilterScope::Dashboard => endpoints::DASHBOARD_VIEW,
        FilterScope::Reports => endpoints::REPORTS_VIEW,
        FilterScope::Transactions => endpoints::TRANSACTIONS_VIEW,
        FilterScope::Recommendations => endpoints::RECOMMENDATIONS_VIEW,
    }
}

/// Only allow redirects to paths on this site.
fn local_redirect(redirect_url: Option<&str>, fallback: &str) -> String {
    match redirect_url {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_owned(),
        _ => fallback.to_owned(),
    }
}
