use crate::core::ledger::BalanceLedger;
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single payment owed to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Who pays.
    pub debtor: ParticipantId,
    /// How much, in the smallest currency unit. Always positive.
    pub amount: i64,
}

/// The final set of pairwise payments that resolves every balance.
///
/// Payments are grouped by creditor: each creditor requests a list of
/// payments whose amounts sum to exactly their balance, and each debtor's
/// payments across all creditors sum to exactly what they owe. Zero-amount
/// payments never appear, so [`Settlement::payment_count`] is the number of
/// actual transactions — the quantity the trial search minimizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    payments: BTreeMap<ParticipantId, Vec<Payment>>,
}

impl Settlement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payment from `debtor` to `creditor`.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn add_payment(&mut self, creditor: ParticipantId, debtor: ParticipantId, amount: i64) {
        assert!(
            amount > 0,
            "Payment amount must be positive, got {}",
            amount
        );
        self.payments
            .entry(creditor)
            .or_default()
            .push(Payment { debtor, amount });
    }

    /// Total number of payments. Lower is better.
    pub fn payment_count(&self) -> usize {
        self.payments.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Creditors receiving at least one payment, in sorted order.
    pub fn creditors(&self) -> impl Iterator<Item = &ParticipantId> {
        self.payments.keys()
    }

    /// Payments directed at a creditor, if any.
    pub fn payments_to(&self, creditor: &ParticipantId) -> Option<&[Payment]> {
        self.payments.get(creditor).map(Vec::as_slice)
    }

    /// Total amount a creditor receives.
    pub fn received_total(&self, creditor: &ParticipantId) -> i64 {
        self.payments
            .get(creditor)
            .map(|ps| ps.iter().map(|p| p.amount).sum())
            .unwrap_or(0)
    }

    /// Total amount a debtor pays out across all creditors.
    pub fn paid_total(&self, debtor: &ParticipantId) -> i64 {
        self.payments
            .values()
            .flatten()
            .filter(|p| p.debtor == *debtor)
            .map(|p| p.amount)
            .sum()
    }

    /// Whether this settlement exactly zeroes every balance in the ledger:
    /// each creditor receives their balance, each debtor pays what they owe,
    /// and no one else appears.
    pub fn settles(&self, ledger: &BalanceLedger) -> bool {
        for (participant, balance) in ledger.entries() {
            let net = self.received_total(participant) - self.paid_total(participant);
            if net != *balance {
                return false;
            }
        }
        // No payments may involve participants outside the ledger.
        self.payments.iter().all(|(creditor, payments)| {
            ledger.balance(creditor) > 0
                && payments.iter().all(|p| ledger.balance(&p.debtor) < 0)
        })
    }

    /// Iterate all (creditor, payment) pairs in creditor order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &Payment)> {
        self.payments
            .iter()
            .flat_map(|(creditor, ps)| ps.iter().map(move |p| (creditor, p)))
    }
}

/// Format an amount of smallest-unit currency as dollars, e.g. `$3.00`.
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    format!("{}${}.{:02}", sign, magnitude / 100, magnitude % 100)
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut creditors: Vec<_> = self.payments.keys().collect();
        creditors.sort_by_key(|c| c.as_str().to_lowercase());

        for creditor in creditors {
            let total = self.received_total(creditor);
            writeln!(f, "{} requests {} from:", creditor, format_amount(total))?;

            let mut payments = self.payments[creditor].clone();
            payments.sort_by(|a, b| {
                b.amount
                    .cmp(&a.amount)
                    .then_with(|| a.debtor.as_str().to_lowercase().cmp(&b.debtor.as_str().to_lowercase()))
            });
            for payment in &payments {
                writeln!(f, "\t{:>8} {}", format_amount(payment.amount), payment.debtor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settlement() -> Settlement {
        let mut s = Settlement::new();
        s.add_payment(ParticipantId::new("@bob"), ParticipantId::new("@alice"), 300);
        s.add_payment(ParticipantId::new("@carol"), ParticipantId::new("@alice"), 200);
        s
    }

    #[test]
    fn test_payment_count() {
        assert_eq!(sample_settlement().payment_count(), 2);
        assert_eq!(Settlement::new().payment_count(), 0);
    }

    #[test]
    fn test_totals() {
        let s = sample_settlement();
        assert_eq!(s.received_total(&ParticipantId::new("@bob")), 300);
        assert_eq!(s.received_total(&ParticipantId::new("@carol")), 200);
        assert_eq!(s.paid_total(&ParticipantId::new("@alice")), 500);
        assert_eq!(s.paid_total(&ParticipantId::new("@bob")), 0);
    }

    #[test]
    fn test_settles_valid_ledger() {
        let ledger = BalanceLedger::from_entries([
            (ParticipantId::new("@alice"), -500),
            (ParticipantId::new("@bob"), 300),
            (ParticipantId::new("@carol"), 200),
        ]);
        assert!(sample_settlement().settles(&ledger));
    }

    #[test]
    fn test_partial_settlement_rejected() {
        let ledger = BalanceLedger::from_entries([
            (ParticipantId::new("@alice"), -500),
            (ParticipantId::new("@bob"), 300),
            (ParticipantId::new("@carol"), 200),
        ]);
        let mut s = Settlement::new();
        s.add_payment(ParticipantId::new("@bob"), ParticipantId::new("@alice"), 300);
        assert!(!s.settles(&ledger));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_payment_rejected() {
        let mut s = Settlement::new();
        s.add_payment(ParticipantId::new("@bob"), ParticipantId::new("@alice"), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(300), "$3.00");
        assert_eq!(format_amount(5), "$0.05");
        assert_eq!(format_amount(123456), "$1234.56");
        assert_eq!(format_amount(-250), "-$2.50");
    }

    #[test]
    fn test_display_report() {
        let report = sample_settlement().to_string();
        assert!(report.contains("@bob requests $3.00 from:"));
        assert!(report.contains("@carol requests $2.00 from:"));
        assert!(report.contains("@alice"));
    }
}
