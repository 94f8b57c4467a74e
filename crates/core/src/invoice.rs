//! Invoice status derivation and payment validation.
//!
//! The status of an invoice is a function of three inputs: its total, the
//! sum of its payments and whether it has been sent. Payments can never push
//! the paid sum past the total.

use crate::error::CoreError;
use crate::status::define_status_enum;
use crate::types::Cents;

define_status_enum! {
    /// Billing state of an invoice.
    InvoiceStatus {
        Unsent = "unsent" => "Unsent",
        Sent = "sent" => "Sent",
        PartiallyPaid = "partially_paid" => "Partially Paid",
        Paid = "paid" => "Paid",
    }
}

define_status_enum! {
    /// How a payment was made.
    PaymentMethod {
        Cash = "cash" => "Cash",
        Check = "check" => "Check",
        Card = "card" => "Card",
        Other = "other" => "Other",
    }
}

/// Result of asking to mark an invoice as sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The invoice moved from Unsent to Sent.
    Sent,
    /// The invoice was already Sent; nothing changed.
    AlreadySent,
}

impl InvoiceStatus {
    /// Unsent -> Sent. Repeating on a Sent invoice is a no-op.
    pub fn mark_sent(self) -> Result<SendOutcome, CoreError> {
        match self {
            InvoiceStatus::Unsent => Ok(SendOutcome::Sent),
            InvoiceStatus::Sent => Ok(SendOutcome::AlreadySent),
            other => Err(CoreError::InvalidTransition(format!(
                "Cannot mark a {} invoice as sent",
                other.label()
            ))),
        }
    }
}

/// Status implied by `total`, the paid sum and the send state.
///
/// Paid iff `paid == total`, Partially Paid iff `0 < paid < total`,
/// otherwise Sent or Unsent.
pub fn derive_status(total: Cents, paid: Cents, sent: bool) -> InvoiceStatus {
    if paid > 0 && paid >= total {
        InvoiceStatus::Paid
    } else if paid > 0 {
        InvoiceStatus::PartiallyPaid
    } else if sent {
        InvoiceStatus::Sent
    } else {
        InvoiceStatus::Unsent
    }
}

/// Invoice totals must be positive.
pub fn validate_total(total: Cents) -> Result<(), CoreError> {
    if total <= 0 {
        return Err(CoreError::InvalidAmount(
            "Invoice total must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Check a new payment against the invoice, returning the new paid sum.
pub fn validate_payment(total: Cents, already_paid: Cents, amount: Cents) -> Result<Cents, CoreError> {
    if amount <= 0 {
        return Err(CoreError::InvalidAmount(
            "Payment amount must be greater than zero".to_string(),
        ));
    }
    let new_paid = already_paid
        .checked_add(amount)
        .ok_or_else(|| CoreError::InvalidAmount("Payment amount is too large".to_string()))?;
    if new_paid > total {
        return Err(CoreError::InvalidAmount(format!(
            "Payment of {} exceeds the balance due of {}",
            crate::money::format_cents(amount),
            crate::money::format_cents(balance(total, already_paid)),
        )));
    }
    Ok(new_paid)
}

/// Amount still owed.
pub fn balance(total: Cents, paid: Cents) -> Cents {
    (total - paid).max(0)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_follows_paid_sum() {
        assert_eq!(derive_status(300, 0, false), InvoiceStatus::Unsent);
        assert_eq!(derive_status(300, 0, true), InvoiceStatus::Sent);
        assert_eq!(derive_status(300, 200, false), InvoiceStatus::PartiallyPaid);
        assert_eq!(derive_status(300, 200, true), InvoiceStatus::PartiallyPaid);
        assert_eq!(derive_status(300, 300, false), InvoiceStatus::Paid);
    }

    #[test]
    fn payment_sequence_reaches_paid_then_rejects_overpayment() {
        let total = 300;
        let paid = validate_payment(total, 0, 200).unwrap();
        assert_eq!(derive_status(total, paid, false), InvoiceStatus::PartiallyPaid);

        let paid = validate_payment(total, paid, 100).unwrap();
        assert_eq!(derive_status(total, paid, false), InvoiceStatus::Paid);

        assert_matches!(
            validate_payment(total, paid, 1),
            Err(CoreError::InvalidAmount(_))
        );
    }

    #[test]
    fn non_positive_payments_rejected() {
        assert_matches!(validate_payment(300, 0, 0), Err(CoreError::InvalidAmount(_)));
        assert_matches!(validate_payment(300, 0, -10), Err(CoreError::InvalidAmount(_)));
    }

    #[test]
    fn overpayment_message_names_balance() {
        let err = validate_payment(30_000, 20_000, 15_000).unwrap_err();
        assert!(err.to_string().contains("balance due of 100.00"));
    }

    #[test]
    fn mark_sent_rules() {
        assert_eq!(InvoiceStatus::Unsent.mark_sent().unwrap(), SendOutcome::Sent);
        assert_eq!(InvoiceStatus::Sent.mark_sent().unwrap(), SendOutcome::AlreadySent);
        assert_matches!(
            InvoiceStatus::Paid.mark_sent(),
            Err(CoreError::InvalidTransition(_))
        );
        assert_matches!(
            InvoiceStatus::PartiallyPaid.mark_sent(),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn totals_must_be_positive() {
        assert!(validate_total(1).is_ok());
        assert_matches!(validate_total(0), Err(CoreError::InvalidAmount(_)));
    }

    #[test]
    fn balance_never_negative() {
        assert_eq!(balance(300, 100), 200);
        assert_eq!(balance(300, 300), 0);
    }

    #[test]
    fn payment_method_parses() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }
}
