//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    date_filter::{reset_date_filter_endpoint, update_date_filter_endpoint},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    recommendation::{get_recommendations_endpoint, get_recommendations_page},
    report::get_reports_page,
    transaction::{get_transactions_page, update_transaction_category_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(
            endpoints::RECOMMENDATIONS_VIEW,
            get(get_recommendations_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api = Router::new()
        .route(
            endpoints::TRANSACTION_CATEGORY,
            put(update_transaction_category_endpoint),
        )
        .route(
            endpoints::DATE_FILTER,
            post(update_date_filter_endpoint).delete(reset_date_filter_endpoint),
        )
        .route(
            endpoints::RECOMMENDATIONS_API,
            post(get_recommendations_endpoint),
        );

    pages
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
