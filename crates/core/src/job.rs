//! Job lifecycle rules and completion actuals.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::define_status_enum;
use crate::types::Cents;

define_status_enum! {
    /// Where a job sits in its lifecycle.
    JobStatus {
        Scheduled = "scheduled" => "Scheduled",
        InProgress = "in_progress" => "In Progress",
        Complete = "complete" => "Complete",
        Cancelled = "cancelled" => "Cancelled",
    }
}

impl JobStatus {
    /// Scheduled -> In Progress.
    pub fn start(self) -> Result<JobStatus, CoreError> {
        match self {
            JobStatus::Scheduled => Ok(JobStatus::InProgress),
            JobStatus::Complete => Err(CoreError::AlreadyCompleted),
            other => Err(CoreError::InvalidTransition(format!(
                "Cannot start a job that is {}",
                other.label()
            ))),
        }
    }

    /// Scheduled | In Progress -> Complete.
    ///
    /// Completing a Complete job yields [`CoreError::AlreadyCompleted`].
    pub fn complete(self) -> Result<JobStatus, CoreError> {
        match self {
            JobStatus::Scheduled | JobStatus::InProgress => Ok(JobStatus::Complete),
            JobStatus::Complete => Err(CoreError::AlreadyCompleted),
            JobStatus::Cancelled => Err(CoreError::InvalidTransition(
                "Cannot complete a cancelled job".to_string(),
            )),
        }
    }

    /// Scheduled | In Progress -> Cancelled.
    pub fn cancel(self) -> Result<JobStatus, CoreError> {
        match self {
            JobStatus::Scheduled | JobStatus::InProgress => Ok(JobStatus::Cancelled),
            other => Err(CoreError::InvalidTransition(format!(
                "Cannot cancel a job that is {}",
                other.label()
            ))),
        }
    }

    /// Customers can only be told the crew is coming for open jobs.
    pub fn ensure_open(self) -> Result<(), CoreError> {
        match self {
            JobStatus::Scheduled | JobStatus::InProgress => Ok(()),
            other => Err(CoreError::InvalidTransition(format!(
                "Job is {}",
                other.label()
            ))),
        }
    }

    /// Cancelled jobs are never billed.
    pub fn ensure_invoiceable(self) -> Result<(), CoreError> {
        if self == JobStatus::Cancelled {
            return Err(CoreError::InvalidTransition(
                "Cannot invoice a cancelled job".to_string(),
            ));
        }
        Ok(())
    }

    /// Completed jobs are frozen.
    pub fn ensure_editable(self) -> Result<(), CoreError> {
        if self == JobStatus::Complete {
            return Err(CoreError::InvalidTransition(
                "Completed jobs cannot be edited".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hours and cost recorded when a job is completed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actuals {
    pub hours: f64,
    pub cost: Cents,
}

impl Actuals {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(CoreError::Validation(format!(
                "Actual hours must be zero or more, got {}",
                self.hours
            )));
        }
        if self.cost < 0 {
            return Err(CoreError::InvalidAmount(
                "Actual cost cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Total for the draft invoice raised on completion, if any.
    ///
    /// A zero-cost job produces no invoice.
    pub fn invoice_total(&self) -> Option<Cents> {
        (self.cost > 0).then_some(self.cost)
    }
}
