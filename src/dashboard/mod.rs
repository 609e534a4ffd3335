//! Dashboard module
//!
//! Provides an overview page showing spending per category as a pie chart.
//! Selecting a category lists the transactions in that category.

mod aggregation;
mod charts;
mod handlers;

pub use aggregation::{CategorySpending, aggregate_by_category};
pub use handlers::get_dashboard_page;
