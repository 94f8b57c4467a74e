pub mod client;
pub mod crew;
pub mod invoice;
pub mod job;
pub mod member;
pub mod quote;
pub mod report;
pub mod task;
