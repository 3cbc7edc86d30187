use settle_engine::core::ledger::BalanceLedger;
use settle_engine::core::participant::ParticipantId;
use settle_engine::core::settlement::format_amount;
use settle_engine::search::orchestrator::{find_best_settlement, SearchConfig, SearchError};
use settle_engine::simulation::random_ledger::{generate_random_ledger, LedgerConfig};

fn ledger(entries: &[(&str, i64)]) -> BalanceLedger {
    BalanceLedger::from_entries(
        entries
            .iter()
            .map(|(name, balance)| (ParticipantId::new(*name), *balance)),
    )
}

fn search(num_trials: usize, workers: usize) -> SearchConfig {
    SearchConfig {
        num_trials,
        workers,
        base_seed: 0,
    }
}

/// Full pipeline: ledger → parallel trial search → settlement report.
#[test]
fn full_pipeline_poker_night() {
    let l = ledger(&[
        ("@alice", -2350),
        ("@bob", 1200),
        ("@carol", -400),
        ("@dave", 900),
        ("@erin", 650),
    ]);
    assert!(l.is_balanced());

    let settlement = find_best_settlement(&l, &search(201, 4)).unwrap();

    assert!(settlement.settles(&l));
    // 2 debtors and 3 creditors: at least 3 payments are needed to reach
    // every creditor, and 4 suffice even in the worst pairing.
    assert!(settlement.payment_count() >= 3);
    assert!(settlement.payment_count() <= 4);

    // Every payment runs from a debtor to a creditor.
    for (creditor, payment) in settlement.iter() {
        assert!(l.balance(creditor) > 0);
        assert!(l.balance(&payment.debtor) < 0);
        assert_ne!(*creditor, payment.debtor);
        assert!(payment.amount > 0);
    }

    let report = settlement.to_string();
    assert!(report.contains("@bob requests $12.00 from:"));
}

/// One debtor, two creditors: the minimal settlement is exactly two
/// payments covering each creditor's balance.
#[test]
fn three_way_split_is_two_payments() {
    let l = ledger(&[("@a", -500), ("@b", 300), ("@c", 200)]);
    let settlement = find_best_settlement(&l, &search(51, 2)).unwrap();

    assert_eq!(settlement.payment_count(), 2);
    assert_eq!(settlement.received_total(&ParticipantId::new("@b")), 300);
    assert_eq!(settlement.received_total(&ParticipantId::new("@c")), 200);
    assert_eq!(settlement.paid_total(&ParticipantId::new("@a")), 500);
    // No payment may run between the two creditors.
    assert!(settlement
        .iter()
        .all(|(_, p)| p.debtor == ParticipantId::new("@a")));
}

/// Zero-balance participants appear in no payment, on either side.
#[test]
fn zero_balance_participant_is_invisible() {
    let l = ledger(&[("@a", -100), ("@b", 100), ("@c", 0)]);
    let settlement = find_best_settlement(&l, &search(11, 2)).unwrap();

    assert_eq!(settlement.payment_count(), 1);
    let idle = ParticipantId::new("@c");
    assert_eq!(settlement.received_total(&idle), 0);
    assert_eq!(settlement.paid_total(&idle), 0);
}

/// An unbalanced ledger fails fast, without a partial settlement.
#[test]
fn unbalanced_ledger_is_fatal() {
    let l = ledger(&[("@a", -100), ("@b", 50)]);
    match find_best_settlement(&l, &search(100, 4)) {
        Err(SearchError::UnbalancedLedger { sum }) => assert_eq!(sum, -50),
        other => panic!("expected UnbalancedLedger, got {:?}", other.map(|s| s.payment_count())),
    }
}

/// Same seed, same trial count → same settlement, for any worker count.
#[test]
fn search_is_reproducible_across_pool_sizes() {
    let l = generate_random_ledger(&LedgerConfig {
        participant_count: 12,
        transfer_count: 40,
        seed: 3,
        ..Default::default()
    });

    let one = find_best_settlement(&l, &search(101, 1)).unwrap();
    let four = find_best_settlement(&l, &search(101, 4)).unwrap();
    let many = find_best_settlement(&l, &search(101, 16)).unwrap();

    assert_eq!(one, four);
    assert_eq!(four, many);
}

/// Continuing the search can only hold or improve the payment count.
#[test]
fn trial_count_is_monotone() {
    let l = generate_random_ledger(&LedgerConfig {
        participant_count: 10,
        transfer_count: 30,
        seed: 11,
        ..Default::default()
    });

    let mut previous = usize::MAX;
    for trials in [1, 5, 25, 125] {
        let settlement = find_best_settlement(&l, &search(trials, 2)).unwrap();
        assert!(settlement.settles(&l));
        assert!(settlement.payment_count() <= previous);
        previous = settlement.payment_count();
    }
}

/// Settlement JSON output carries creditor → payments structure.
#[test]
fn settlement_serializes() {
    let l = ledger(&[("@a", -500), ("@b", 300), ("@c", 200)]);
    let settlement = find_best_settlement(&l, &search(51, 2)).unwrap();

    let json = serde_json::to_string_pretty(&settlement).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let payments = parsed.get("payments").unwrap();
    assert!(payments.get("@b").is_some());
    assert!(payments.get("@c").is_some());
    assert!(payments.get("@a").is_none());
}

#[test]
fn amounts_format_as_dollars() {
    assert_eq!(format_amount(2350), "$23.50");
    assert_eq!(format_amount(5), "$0.05");
    assert_eq!(format_amount(100), "$1.00");
}
