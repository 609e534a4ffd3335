//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element defined in
//! [crate::html::base], either as the target of an error response or via an
//! out-of-band swap.

use std::time::Duration;

use axum::response::{IntoResponse, Response};
use maud::{Markup, PreEscaped, html};

/// How long transient alerts stay on screen before removing themselves.
pub const ALERT_DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// An alert message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details on what went wrong.
    Error { message: String, details: String },
}

impl Alert {
    fn parts(&self) -> (bool, &str, Option<&str>) {
        match self {
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
        }
    }

    /// Render the alert with a close button.
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = self.parts();

        let style = if is_success {
            "flex items-start p-4 mb-4 text-green-800 border border-green-300 \
            rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 \
            dark:border-green-800"
        } else {
            "flex items-start p-4 mb-4 text-red-800 border border-red-300 \
            rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 \
            dark:border-red-800"
        };

        html! {
            div
                class=(style)
                role="alert"
            {
                div class="ms-3 text-sm"
                {
                    span class="font-medium" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex \
                        items-center justify-center h-8 w-8 hover:opacity-75"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }

    /// Render the alert as an out-of-band swap into `#alert-container` that
    /// removes itself after `dismiss_after`.
    pub fn into_transient_html(self, dismiss_after: Duration) -> Markup {
        let script = format!(
            "setTimeout(function() {{ \
                const alert = document.getElementById('transient-alert'); \
                if (alert) {{ alert.remove(); }} \
            }}, {});",
            dismiss_after.as_millis()
        );

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div id="transient-alert" { (self.into_html()) }
                script { (PreEscaped(script)) }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
