//! Inclusive date windows used to restrict transactions for reports.

use serde::Serialize;
use time::{Date, Month};

use crate::Error;

/// An inclusive `[start_date, end_date]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    /// The first date in the window.
    pub start_date: Date,
    /// The last date in the window.
    pub end_date: Date,
}

impl DateWindow {
    /// The window covering every day of `month` in `year`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `year` is outside the range supported by [Date].
    pub fn month(year: i32, month: Month) -> Result<Self, Error> {
        let start_date = Date::from_calendar_date(year, month, 1)
            .map_err(|error| Error::Validation(error.to_string()))?;
        let end_date = Date::from_calendar_date(year, month, last_day_of_month(year, month))
            .map_err(|error| Error::Validation(error.to_string()))?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The window covering the calendar month that contains `today`.
    pub fn current_month(today: Date) -> Self {
        let start_date = today.replace_day(1).unwrap_or(today);
        let end_date = today
            .replace_day(last_day_of_month(today.year(), today.month()))
            .unwrap_or(today);

        Self {
            start_date,
            end_date,
        }
    }

    /// Resolve the window for a report request.
    ///
    /// The window is only taken from the request when both bounds are given,
    /// otherwise the current month is used.
    pub fn from_query(start_date: Option<Date>, end_date: Option<Date>, today: Date) -> Self {
        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) => Self {
                start_date,
                end_date,
            },
            _ => Self::current_month(today),
        }
    }

    /// Whether `date` falls inside the window, bounds included.
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Parse a month number from a request into a [Month].
///
/// # Errors
/// Returns [Error::Validation] if `month` is not in 1–12.
pub fn parse_month(month: u8) -> Result<Month, Error> {
    Month::try_from(month)
        .map_err(|_| Error::Validation("month must be between 1 and 12".to_owned()))
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
