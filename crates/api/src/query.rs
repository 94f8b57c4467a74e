//! Shared query parameter types for list, calendar and report endpoints.
//!
//! Values arrive as raw strings so HTML filter forms can submit blanks;
//! parsing into domain types happens here.

use std::str::FromStr;

use chrono::NaiveDate;
use landscaper_core::calendar::CalendarMonth;
use landscaper_core::error::CoreError;
use landscaper_core::reporting::DateRange;
use serde::Deserialize;

/// `?status=` filter for list endpoints. Blank means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

impl StatusFilterParams {
    pub fn parse<S>(&self) -> Result<Option<S>, CoreError>
    where
        S: FromStr<Err = CoreError>,
    {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// `?year=&month=` for the calendar. Missing values fall back to `today`.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl CalendarParams {
    pub fn month(&self, today: NaiveDate) -> Result<CalendarMonth, CoreError> {
        let current = CalendarMonth::containing(today)?;
        let year = parse_optional::<i32>("year", self.year.as_deref())?.unwrap_or(current.year());
        let month = parse_optional::<i32>("month", self.month.as_deref())?
            .unwrap_or(current.month() as i32);
        CalendarMonth::normalized(year, month)
    }
}

/// `?from=&to=` for revenue reports. Defaults to the twelve months ending
/// with the current one.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRangeParams {
    pub fn range(&self, today: NaiveDate) -> Result<DateRange, CoreError> {
        let default = DateRange::trailing_months(today, 12)?;
        let from = parse_optional::<NaiveDate>("from", self.from.as_deref())?.unwrap_or(default.from);
        let to = parse_optional::<NaiveDate>("to", self.to.as_deref())?.unwrap_or(default.to);
        DateRange::new(from, to)
    }
}

fn parse_optional<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{field}: '{value}' is not valid"))),
    }
}
