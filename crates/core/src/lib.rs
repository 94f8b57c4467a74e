//! Domain rules for the landscaping business manager.
//!
//! Everything in this crate is free of database and HTTP concerns so the
//! status transitions, money handling and report aggregation can be unit
//! tested directly.

pub mod calendar;
pub mod error;
pub mod invoice;
pub mod job;
pub mod money;
pub mod pdf;
pub mod quote;
pub mod reporting;
pub mod status;
pub mod types;
pub mod validation;
