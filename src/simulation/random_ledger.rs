use crate::core::ledger::BalanceLedger;
use crate::core::participant::ParticipantId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for generating a random balanced ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Number of participants.
    pub participant_count: usize,
    /// Number of random pairwise transfers applied.
    pub transfer_count: usize,
    /// Maximum single transfer amount, smallest currency unit.
    pub max_amount: i64,
    /// RNG seed, so generated fixtures are reproducible.
    pub seed: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            participant_count: 10,
            transfer_count: 30,
            max_amount: 10_000,
            seed: 0,
        }
    }
}

/// Generate a random ledger that is balanced by construction: every
/// transfer debits one participant and credits another, so the net
/// balances always sum to zero.
pub fn generate_random_ledger(config: &LedgerConfig) -> BalanceLedger {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut balances = vec![0i64; config.participant_count];

    if config.participant_count >= 2 {
        for _ in 0..config.transfer_count {
            let from = rng.gen_range(0..config.participant_count);
            let mut to = rng.gen_range(0..config.participant_count);
            while to == from {
                to = rng.gen_range(0..config.participant_count);
            }
            let amount = rng.gen_range(1..=config.max_amount);
            balances[from] -= amount;
            balances[to] += amount;
        }
    }

    BalanceLedger::from_entries(
        balances
            .into_iter()
            .enumerate()
            .map(|(i, balance)| (ParticipantId::new(format!("PLAYER-{:03}", i)), balance)),
    )
}
