//! Read-side aggregations for the reports screen.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::CalendarMonth;
use crate::error::CoreError;
use crate::job::JobStatus;
use crate::types::Cents;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::Validation(format!(
                "Range start {from} is after range end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The `months` whole calendar months ending with the month of `today`.
    pub fn trailing_months(today: NaiveDate, months: u32) -> Result<Self, CoreError> {
        let current = CalendarMonth::containing(today)?;
        let span = months.max(1) as i32 - 1;
        let start = CalendarMonth::normalized(current.year(), current.month() as i32 - span)?;
        Self::new(start.first_day(), current.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Payments collected in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`.
    pub label: String,
    pub total: Cents,
    pub payment_count: usize,
}

/// Sum payment amounts per calendar month, oldest month first.
///
/// Payments dated outside `range` are ignored. Months without payments are
/// omitted.
pub fn revenue_by_month(
    payments: impl IntoIterator<Item = (NaiveDate, Cents)>,
    range: DateRange,
) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<(i32, u32), (Cents, usize)> = BTreeMap::new();
    for (paid_on, amount) in payments {
        if !range.contains(paid_on) {
            continue;
        }
        let bucket = buckets
            .entry((paid_on.year(), paid_on.month()))
            .or_insert((0, 0));
        bucket.0 += amount;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), (total, payment_count))| MonthlyRevenue {
            year,
            month,
            label: format!("{year:04}-{month:02}"),
            total,
            payment_count,
        })
        .collect()
}

/// Number of jobs currently in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: JobStatus,
    pub label: &'static str,
    pub count: i64,
}

/// Every job status in lifecycle order with its count (zero when absent).
pub fn jobs_by_status(counts: impl IntoIterator<Item = (JobStatus, i64)>) -> Vec<StatusCount> {
    let mut tally: BTreeMap<&'static str, i64> = BTreeMap::new();
    for (status, count) in counts {
        *tally.entry(status.as_str()).or_default() += count;
    }
    JobStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            label: status.label(),
            count: tally.get(status.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_are_independent_and_sum_to_total() {
        let payments = vec![
            (date(2026, 9, 3), 20_000),
            (date(2026, 9, 30), 5_000),
            (date(2026, 10, 1), 10_000),
            (date(2026, 10, 15), 2_500),
        ];
        let range = DateRange::new(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let months = revenue_by_month(payments.clone(), range);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "2026-09");
        assert_eq!(months[0].total, 25_000);
        assert_eq!(months[0].payment_count, 2);
        assert_eq!(months[1].label, "2026-10");
        assert_eq!(months[1].total, 12_500);

        let grand: Cents = months.iter().map(|m| m.total).sum();
        let recorded: Cents = payments.iter().map(|(_, a)| a).sum();
        assert_eq!(grand, recorded);
    }

    #[test]
    fn payments_outside_range_are_ignored() {
        let payments = vec![
            (date(2026, 8, 31), 1_000),
            (date(2026, 9, 1), 2_000),
            (date(2026, 9, 30), 3_000),
            (date(2026, 10, 1), 4_000),
        ];
        let range = DateRange::new(date(2026, 9, 1), date(2026, 9, 30)).unwrap();
        let months = revenue_by_month(payments, range);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].total, 5_000);
    }

    #[test]
    fn same_month_different_years_stay_apart() {
        let payments = vec![(date(2025, 5, 1), 100), (date(2026, 5, 1), 200)];
        let range = DateRange::new(date(2025, 1, 1), date(2026, 12, 31)).unwrap();
        let months = revenue_by_month(payments, range);
        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].total), (2025, 100));
        assert_eq!((months[1].year, months[1].total), (2026, 200));
    }

    #[test]
    fn inverted_range_rejected() {
        assert_matches!(
            DateRange::new(date(2026, 2, 1), date(2026, 1, 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn trailing_months_spans_whole_months() {
        let range = DateRange::trailing_months(date(2026, 10, 16), 12).unwrap();
        assert_eq!(range.from, date(2025, 11, 1));
        assert_eq!(range.to, date(2026, 10, 31));

        let single = DateRange::trailing_months(date(2026, 2, 10), 1).unwrap();
        assert_eq!(single.from, date(2026, 2, 1));
        assert_eq!(single.to, date(2026, 2, 28));
    }

    #[test]
    fn status_counts_fill_missing_statuses() {
        let counts = jobs_by_status(vec![(JobStatus::Complete, 4), (JobStatus::Scheduled, 2)]);
        let pairs: Vec<_> = counts.iter().map(|c| (c.status, c.count)).collect();
        assert_eq!(
            pairs,
            vec![
                (JobStatus::Scheduled, 2),
                (JobStatus::InProgress, 0),
                (JobStatus::Complete, 4),
                (JobStatus::Cancelled, 0),
            ]
        );
    }
}
