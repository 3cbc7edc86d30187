//! Minimal example: settle three participants with one debtor.
//!
//! ```bash
//! cargo run --example basic_settlement
//! ```

use settle_engine::prelude::*;

fn main() {
    // @alice owes $5.00; @bob is owed $3.00 and @carol $2.00.
    let ledger = BalanceLedger::from_entries([
        (ParticipantId::new("@alice"), -500),
        (ParticipantId::new("@bob"), 300),
        (ParticipantId::new("@carol"), 200),
    ]);

    let config = SearchConfig {
        num_trials: 101,
        ..Default::default()
    };

    match find_best_settlement(&ledger, &config) {
        Ok(settlement) => {
            println!("Settled in {} payments:\n", settlement.payment_count());
            print!("{}", settlement);
        }
        Err(e) => eprintln!("Settlement failed: {}", e),
    }
}
