//! Date range filters that remember their value between page loads.
//!
//! Each page that filters by date owns a [FilterScope], which names the key
//! its range is saved under in a [KeyValueStore].

mod endpoint;
mod view;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    store::{self, KeyValueStore},
};

pub use endpoint::{reset_date_filter_endpoint, update_date_filter_endpoint};
pub use view::date_range_controls;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse an ISO 8601 calendar date such as "2024-01-31".
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// An inclusive range of calendar days where either side may be open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range, `None` for no lower bound.
    pub start: Option<Date>,
    /// The last day in the range, `None` for no upper bound.
    pub end: Option<Date>,
}

impl DateRange {
    /// A range with both sides set.
    pub fn new(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// The first day of the month `today` falls in, up to and including `today`.
    pub fn current_month_to_date(today: Date) -> Self {
        let first_of_month = today - Duration::days(i64::from(today.day()) - 1);

        Self::new(first_of_month, today)
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    fn to_persisted(self) -> PersistedDateRange {
        PersistedDateRange {
            start_date: self.start.map(|date| date.to_string()),
            end_date: self.end.map(|date| date.to_string()),
        }
    }
}

/// The pages that keep their own date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterScope {
    /// The dashboard page.
    Dashboard,
    /// The reports page.
    Reports,
    /// The transactions table page.
    Transactions,
    /// The recommendations page.
    Recommendations,
}

impl FilterScope {
    /// The key the scope's date range is saved under.
    pub fn storage_key(self) -> &'static str {
        match self {
            FilterScope::Dashboard => "dashboardDateFilters",
            FilterScope::Reports => "reportsDateFilters",
            FilterScope::Transactions => "transactionTableDateFilters",
            FilterScope::Recommendations => "recommendationsDateFilters",
        }
    }

    /// The path segment used for the scope in date filter endpoints.
    pub fn as_path_segment(self) -> &'static str {
        match self {
            FilterScope::Dashboard => "dashboard",
            FilterScope::Reports => "reports",
            FilterScope::Transactions => "transactions",
            FilterScope::Recommendations => "recommendations",
        }
    }
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDateRange {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

/// The saved date range for one [FilterScope].
pub struct DateFilter<'a> {
    store: &'a dyn KeyValueStore,
    scope: FilterScope,
    defaults: DateRange,
}

impl<'a> DateFilter<'a> {
    /// Create a filter that reads and writes `scope` in `store`, using
    /// `defaults` for anything that has not been saved.
    pub fn new(store: &'a dyn KeyValueStore, scope: FilterScope, defaults: DateRange) -> Self {
        Self {
            store,
            scope,
            defaults,
        }
    }

    /// The range used when nothing usable has been saved.
    pub fn defaults(&self) -> DateRange {
        self.defaults
    }

    /// Get the saved range.
    ///
    /// Each side that is missing, `null` or not a valid date falls back to the
    /// matching side of the defaults.
    pub fn load(&self) -> DateRange {
        let key = self.scope.storage_key();

        let Some(persisted) = store::read::<PersistedDateRange>(self.store, key) else {
            return self.defaults;
        };

        let parse_side = |side: Option<String>| {
            side.and_then(|text| {
                parse_date(&text)
                    .inspect_err(|_| tracing::warn!("ignoring invalid date {text:?} in \"{key}\""))
                    .ok()
            })
        };

        DateRange {
            start: parse_side(persisted.start_date).or(self.defaults.start),
            end: parse_side(persisted.end_date).or(self.defaults.end),
        }
    }

    /// Apply `updater` to the current range and save the result.
    ///
    /// Nothing is written when the new range formats the same as the current
    /// one.
    ///
    /// # Errors
    /// Returns an error if the new range could not be written to the store.
    ///
    /// Returns `true` if the range was written.
    pub fn update(&self, updater: impl FnOnce(DateRange) -> DateRange) -> Result<bool, Error> {
        let current = self.load();
        let updated = updater(current).to_persisted();

        if updated == current.to_persisted() {
            return Ok(false);
        }

        tracing::debug!(
            "saving date filter \"{}\": {updated:?}",
            self.scope.storage_key()
        );
        store::write(self.store, self.scope.storage_key(), &updated)?;

        Ok(true)
    }

    /// Set the start date, moving the end date forward to `start` if the
    /// range would otherwise be inverted.
    ///
    /// # Errors
    /// Returns an error if the new range could not be written to the store.
    pub fn set_start(&self, start: Date) -> Result<bool, Error> {
        let default_end = self.defaults.end;

        self.update(|range| {
            let end = range.end.or(default_end).map(|end| end.max(start));

            DateRange {
                start: Some(start),
                end,
            }
        })
    }

    /// Set the end date, moving the start date back to `end` if the range
    /// would otherwise be inverted.
    ///
    /// # Errors
    /// Returns an error if the new range could not be written to the store.
    pub fn set_end(&self, end: Date) -> Result<bool, Error> {
        let default_start = self.defaults.start;

        self.update(|range| {
            let start = range.start.or(default_start).map(|start| start.min(end));

            DateRange {
                start,
                end: Some(end),
            }
        })
    }

    /// Forget the saved range so that [DateFilter::load] returns the defaults.
    ///
    /// # Errors
    /// Returns an error if the store could not be updated.
    pub fn reset(&self) -> Result<(), Error> {
        self.store.clear(self.scope.storage_key())
    }
}
