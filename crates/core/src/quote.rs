//! Quote lifecycle rules.
//!
//! ```text
//! Draft ──send──> Sent ──accept──> Accepted
//!   │               │
//!   ├──accept───────┼────────────> Accepted
//!   └──decline──────┴──decline───> Declined
//! ```
//!
//! Accepted and Declined are terminal. Only Draft quotes may be edited.

use crate::error::CoreError;
use crate::status::define_status_enum;
use crate::types::Cents;

define_status_enum! {
    /// Where a quote sits in its lifecycle.
    QuoteStatus {
        Draft = "draft" => "Draft",
        Sent = "sent" => "Sent",
        Accepted = "accepted" => "Accepted",
        Declined = "declined" => "Declined",
    }
}

impl QuoteStatus {
    /// Accepted and Declined quotes cannot change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, QuoteStatus::Accepted | QuoteStatus::Declined)
    }

    /// Draft -> Sent.
    pub fn send(self) -> Result<QuoteStatus, CoreError> {
        match self {
            QuoteStatus::Draft => Ok(QuoteStatus::Sent),
            other => Err(CoreError::InvalidTransition(format!(
                "Only draft quotes can be sent (quote is {})",
                other.label()
            ))),
        }
    }

    /// Draft | Sent -> Accepted. Accepting twice is rejected.
    pub fn accept(self) -> Result<QuoteStatus, CoreError> {
        match self {
            QuoteStatus::Draft | QuoteStatus::Sent => Ok(QuoteStatus::Accepted),
            other => Err(CoreError::InvalidTransition(format!(
                "Cannot accept a quote that is already {}",
                other.label()
            ))),
        }
    }

    /// Any non-terminal status -> Declined.
    pub fn decline(self) -> Result<QuoteStatus, CoreError> {
        if self.is_terminal() {
            return Err(CoreError::InvalidTransition(format!(
                "Cannot decline a quote that is already {}",
                self.label()
            )));
        }
        Ok(QuoteStatus::Declined)
    }

    /// Scope, line items and valid-until may only change while Draft.
    pub fn ensure_editable(self) -> Result<(), CoreError> {
        match self {
            QuoteStatus::Draft => Ok(()),
            other => Err(CoreError::InvalidTransition(format!(
                "Only draft quotes can be edited (quote is {})",
                other.label()
            ))),
        }
    }
}

/// Sum of line totals.
pub fn quote_total(line_totals: impl IntoIterator<Item = Cents>) -> Cents {
    line_totals.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn draft_and_sent_can_be_accepted() {
        assert_eq!(QuoteStatus::Draft.accept().unwrap(), QuoteStatus::Accepted);
        assert_eq!(QuoteStatus::Sent.accept().unwrap(), QuoteStatus::Accepted);
    }

    #[test]
    fn accept_twice_is_invalid_transition() {
        let accepted = QuoteStatus::Draft.accept().unwrap();
        assert_matches!(accepted.accept(), Err(CoreError::InvalidTransition(_)));
    }

    #[test]
    fn declined_cannot_be_accepted() {
        assert_matches!(
            QuoteStatus::Declined.accept(),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn decline_only_from_non_terminal() {
        assert_eq!(QuoteStatus::Draft.decline().unwrap(), QuoteStatus::Declined);
        assert_eq!(QuoteStatus::Sent.decline().unwrap(), QuoteStatus::Declined);
        assert_matches!(
            QuoteStatus::Accepted.decline(),
            Err(CoreError::InvalidTransition(_))
        );
        assert_matches!(
            QuoteStatus::Declined.decline(),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn send_only_from_draft() {
        assert_eq!(QuoteStatus::Draft.send().unwrap(), QuoteStatus::Sent);
        for status in [QuoteStatus::Sent, QuoteStatus::Accepted, QuoteStatus::Declined] {
            assert_matches!(status.send(), Err(CoreError::InvalidTransition(_)));
        }
    }

    #[test]
    fn only_draft_is_editable() {
        assert!(QuoteStatus::Draft.ensure_editable().is_ok());
        assert!(QuoteStatus::Sent.ensure_editable().is_err());
        assert!(QuoteStatus::Accepted.ensure_editable().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!QuoteStatus::Draft.is_terminal());
        assert!(!QuoteStatus::Sent.is_terminal());
        assert!(QuoteStatus::Accepted.is_terminal());
        assert!(QuoteStatus::Declined.is_terminal());
    }

    #[test]
    fn total_sums_lines() {
        assert_eq!(quote_total([10_000, 2_550, 0]), 12_550);
        assert_eq!(quote_total(Vec::new()), 0);
    }
}
