//! Reports on transactions grouped by category.

mod page;
mod summary;

pub use page::get_reports_page;
pub use summary::{CategorySummary, get_category_summaries};
