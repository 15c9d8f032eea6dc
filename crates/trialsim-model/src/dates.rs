//! Calendar arithmetic shared by the generators.

use chrono::{Months, NaiveDate, TimeDelta};

use crate::ModelError;

/// ISO 8601 calendar date format used in every table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, ModelError> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ModelError::DateOutOfRange(format!("{date} + {days} days")))
}

/// Subtract whole years, clamping Feb 29 to Feb 28 in non-leap years.
pub fn sub_years(date: NaiveDate, years: u32) -> Result<NaiveDate, ModelError> {
    date.checked_sub_months(Months::new(years * 12))
        .ok_or_else(|| ModelError::DateOutOfRange(format!("{date} - {years} years")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
