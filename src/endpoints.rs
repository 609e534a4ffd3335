//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}/category', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page with charts of spending by category.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for browsing, filtering and sorting transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page with a summary of spending per category.
pub const REPORTS_VIEW: &str = "/reports";
/// The page for requesting savings recommendations.
pub const RECOMMENDATIONS_VIEW: &str = "/recommendations";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for changing the category of a transaction.
pub const TRANSACTION_CATEGORY: &str = "/api/transactions/{transaction_id}/category";
/// The route for editing or resetting the saved date range of a page.
pub const DATE_FILTER: &str = "/api/date_filters/{scope}";
/// The route for requesting recommendations from the agent.
pub const RECOMMENDATIONS_API: &str = "/api/recommendations";

/// Replace the parameter in `endpoint_path` with `param`.
///
/// Only the first parameter is replaced, a path without a parameter is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, param: impl Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        param,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REPORTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::RECOMMENDATIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
        assert_endpoint_is_valid_uri(endpoints::RECOMMENDATIONS_API);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION_CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DATE_FILTER, "reports"));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn accepts_text_parameters() {
        let formatted_path = format_endpoint(endpoints::DATE_FILTER, "dashboard");

        assert_eq!(formatted_path, "/api/date_filters/dashboard");
    }
}
