//! Month grids for the job calendar.
//!
//! Weeks start on Monday. Each week row has seven cells; cells before the
//! first and after the last day of the month are blank.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, Months, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;

/// A calendar month (year 1..=9999).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
    #[serde(skip)]
    first: NaiveDate,
}

impl CalendarMonth {
    /// Build a month, rolling out-of-range month numbers into adjacent
    /// years (`(2026, 0)` is December 2025, `(2026, 13)` is January 2027).
    pub fn normalized(year: i32, month: i32) -> Result<Self, CoreError> {
        let index = i64::from(year) * 12 + i64::from(month) - 1;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) + 1;
        if !(1..=9999).contains(&year) {
            return Err(CoreError::Validation(format!(
                "Year {year} is outside the supported range"
            )));
        }
        let (year, month) = (year as i32, month as u32);
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CoreError::Validation(format!("Invalid calendar month {year}-{month:02}"))
        })?;
        Ok(Self { year, month, first })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, CoreError> {
        Self::normalized(date.year(), date.month() as i32)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// English month name, e.g. `"October"`.
    pub fn name(self) -> &'static str {
        Month::try_from(self.month as u8).map_or("", |m| m.name())
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// The day before the first of the following month.
    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The previous month, or `None` before year 1.
    pub fn prev(self) -> Option<Self> {
        Self::normalized(self.year, self.month as i32 - 1).ok()
    }

    /// The next month, or `None` after year 9999.
    pub fn next(self) -> Option<Self> {
        Self::normalized(self.year, self.month as i32 + 1).ok()
    }

    /// Monday-first week rows of day numbers.
    pub fn weeks(self) -> Vec<[Option<u32>; 7]> {
        let offset = self.first.weekday().num_days_from_monday() as usize;
        let days = self.days_in_month() as usize;
        let cells = (offset + days).div_ceil(7) * 7;

        (0..cells)
            .map(|i| (i >= offset && i < offset + days).then(|| (i - offset + 1) as u32))
            .collect::<Vec<_>>()
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week.copy_from_slice(chunk);
                week
            })
            .collect()
    }
}

/// One cell of the month grid.
#[derive(Debug, Serialize)]
pub struct DayCell<T> {
    pub day: Option<u32>,
    pub date: Option<NaiveDate>,
    pub is_today: bool,
    pub items: Vec<T>,
}

/// A month grid with the items scheduled on each day.
#[derive(Debug, Serialize)]
pub struct MonthView<T> {
    pub month: CalendarMonth,
    pub name: &'static str,
    pub prev: Option<CalendarMonth>,
    pub next: Option<CalendarMonth>,
    pub weeks: Vec<Vec<DayCell<T>>>,
    pub item_count: usize,
}

/// Group items by the date `date_of` assigns them, preserving input order
/// within a day.
pub fn group_by_day<T>(
    items: impl IntoIterator<Item = T>,
    date_of: impl Fn(&T) -> NaiveDate,
) -> BTreeMap<NaiveDate, Vec<T>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for item in items {
        grouped.entry(date_of(&item)).or_default().push(item);
    }
    grouped
}

/// Lay out `items` on the grid for `month`. Items dated outside the month
/// are dropped.
pub fn month_view<T>(
    month: CalendarMonth,
    items: impl IntoIterator<Item = T>,
    date_of: impl Fn(&T) -> NaiveDate,
    today: NaiveDate,
) -> MonthView<T> {
    let mut by_day = group_by_day(
        items.into_iter().filter(|item| month.contains(date_of(item))),
        &date_of,
    );
    let item_count = by_day.values().map(Vec::len).sum();

    let weeks = month
        .weeks()
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|day| {
                    let date = day.and_then(|d| NaiveDate::from_ymd_opt(month.year, month.month, d));
                    let items = date.and_then(|d| by_day.remove(&d)).unwrap_or_default();
                    DayCell {
                        day,
                        date,
                        is_today: date == Some(today),
                        items,
                    }
                })
                .collect()
        })
        .collect();

    MonthView {
        month,
        name: month.name(),
        prev: month.prev(),
        next: month.next(),
        weeks,
        item_count,
    }
}
