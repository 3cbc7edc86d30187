//! Settle a randomly generated eight-player poker night and compare the
//! searched payment count against the trivial everyone-pays-everyone bound.
//!
//! ```bash
//! cargo run --example poker_night
//! ```

use settle_engine::core::settlement::format_amount;
use settle_engine::prelude::*;
use settle_engine::simulation::random_ledger::{generate_random_ledger, LedgerConfig};

fn main() {
    let ledger = generate_random_ledger(&LedgerConfig {
        participant_count: 8,
        transfer_count: 30,
        max_amount: 5_000,
        seed: 2024,
    });

    println!("Final balances:");
    for (player, balance) in ledger.entries() {
        println!("  {:<12} {:>10}", player.to_string(), format_amount(*balance));
    }

    let debtors = ledger.debtors().count();
    let creditors = ledger.creditors().count();

    let config = SearchConfig {
        num_trials: 1001,
        ..Default::default()
    };
    let settlement = find_best_settlement(&ledger, &config).expect("balanced by construction");

    println!(
        "\nTrivial settlement: {} payments; search found {}.\n",
        debtors * creditors,
        settlement.payment_count()
    );
    print!("{}", settlement);
}
