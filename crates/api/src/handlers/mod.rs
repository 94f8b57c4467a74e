pub mod calendar;
pub mod client;
pub mod crew;
pub mod invoice;
pub mod job;
pub mod member;
pub mod quote;
pub mod report;
pub mod task;

use chrono::NaiveDate;

/// The business's current calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
