//! Tally is a web app for reviewing financial transactions.
//!
//! This library provides a REST API that directly serves HTML pages: a
//! filterable transactions table, a dashboard of spending by category,
//! per-category reports and savings recommendations from an external agent.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod database_id;
mod date_filter;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod recommendation;
mod report;
mod routing;
mod split_layout;
mod store;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use category::{
    Category, CategoryBuilder, CategoryName, create_category, get_all_categories, get_category,
};
pub use dashboard::{CategorySpending, aggregate_by_category};
pub use date_filter::{DateFilter, DateRange, FilterScope};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use recommendation::{
    AgentClient, AgentSettings, Recommendation, RecommendationRequest, RecommendationResponse,
    RequestSequencer, Ticket,
};
pub use report::{CategorySummary, get_category_summaries};
pub use routing::build_router;
pub use split_layout::{ResizeState, SplitLayout, SplitLayoutConfig, Width};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use transaction::{
    SortConfig, SortDirection, SortKey, TableFilter, Transaction, TransactionBuilder,
    TransactionUpdate, categories_in, create_transaction, filter_and_sort, get_all_transactions,
    get_transaction, get_transactions_in_range, table_total, update_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
