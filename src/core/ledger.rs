use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// The net balance of every participant, in the smallest currency unit.
///
/// A positive balance means the participant is owed (net creditor).
/// A negative balance means the participant owes (net debtor).
///
/// Entry order is significant: a participant's position in the ledger is
/// its ordinal in the flow network, so a fixed ledger always produces the
/// same graph topology.
///
/// The engine assumes a closed ledger — balances summing to exactly zero.
/// [`BalanceLedger::is_balanced`] checks this; the search orchestrator
/// treats an unbalanced ledger as a fatal precondition violation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceLedger {
    entries: Vec<(ParticipantId, i64)>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from raw entries, summing balances of duplicate
    /// participants. First-seen order is preserved.
    pub fn from_entries(entries: impl IntoIterator<Item = (ParticipantId, i64)>) -> Self {
        let mut ledger = Self::new();
        for (participant, balance) in entries {
            ledger.add(participant, balance);
        }
        ledger
    }

    /// Add a balance, accumulating onto an existing entry for the same
    /// participant if there is one.
    pub fn add(&mut self, participant: ParticipantId, balance: i64) {
        match self.entries.iter_mut().find(|(p, _)| *p == participant) {
            Some((_, existing)) => *existing += balance,
            None => self.entries.push((participant, balance)),
        }
    }

    /// All entries in ledger order.
    pub fn entries(&self) -> &[(ParticipantId, i64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Net balance of a participant, zero if unknown.
    pub fn balance(&self, participant: &ParticipantId) -> i64 {
        self.entries
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, b)| *b)
            .unwrap_or(0)
    }

    /// Whether balances sum to exactly zero (the closed-ledger invariant).
    pub fn is_balanced(&self) -> bool {
        self.entries.iter().map(|(_, b)| i128::from(*b)).sum::<i128>() == 0
    }

    /// Sum of all positive balances: the total amount that must move.
    ///
    /// On a balanced ledger this equals the total debt magnitude.
    pub fn total_credit(&self) -> i64 {
        self.entries.iter().map(|(_, b)| (*b).max(0)).sum()
    }

    /// Net creditors as (ordinal, participant, amount owed to them).
    pub fn creditors(&self) -> impl Iterator<Item = (usize, &ParticipantId, i64)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, b))| *b > 0)
            .map(|(i, (p, b))| (i, p, *b))
    }

    /// Net debtors as (ordinal, participant, amount they owe).
    pub fn debtors(&self) -> impl Iterator<Item = (usize, &ParticipantId, i64)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, b))| *b < 0)
            .map(|(i, (p, b))| (i, p, -*b))
    }
}
