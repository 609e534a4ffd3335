//! This file defines the navigation menu shown in the left pane of every page.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block rounded-lg bg-blue-50 px-3 py-2 font-semibold text-blue-700 \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
            hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 \
            dark:hover:text-blue-200"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = [
            (endpoints::TRANSACTIONS_VIEW, "Transactions"),
            (endpoints::DASHBOARD_VIEW, "Dashboard"),
            (endpoints::REPORTS_VIEW, "Reports"),
            (endpoints::RECOMMENDATIONS_VIEW, "Recommendations"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_endpoint == url,
        })
        .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="flex flex-col gap-6 text-gray-900 dark:text-white"
            {
                a href=(endpoints::ROOT) class="flex items-center space-x-3 px-3"
                {
                    span class="self-center text-2xl font-semibold whitespace-nowrap"
                    {
                        "Tally"
                    }
                }

                ul class="flex flex-col gap-1 text-sm font-medium" aria-label="Primary"
                {
                    @for link in self.links {
                        li { (link.into_html()) }
                    }
                }
            }
        )
    }
}
