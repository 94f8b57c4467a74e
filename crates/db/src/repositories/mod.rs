//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` (or any SQLite executor, for reads that also run
//! inside a transaction) as the first argument.

pub mod client_repo;
pub mod crew_repo;
pub mod invoice_repo;
pub mod job_repo;
pub mod member_repo;
pub mod quote_repo;
pub mod report_repo;
pub mod task_repo;

pub use client_repo::ClientRepo;
pub use crew_repo::CrewRepo;
pub use invoice_repo::InvoiceRepo;
pub use job_repo::JobRepo;
pub use member_repo::MemberRepo;
pub use quote_repo::QuoteRepo;
pub use report_repo::ReportRepo;
pub use task_repo::TaskRepo;
