//! settle-engine CLI
//!
//! Find a minimal-transaction settlement from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle balances from a JSON file
//! settle-engine settle --input balances.json
//!
//! # Settle a CSV export (Venmo/Balance columns), 5000 trials, HTML report
//! settle-engine settle --input cashouts.csv --trials 5000 --format html
//!
//! # Generate a random balanced ledger for testing
//! settle-engine generate --participants 10 --transfers 30
//! ```

use settle_engine::core::ledger::BalanceLedger;
use settle_engine::core::participant::ParticipantId;
use settle_engine::core::settlement::{format_amount, Settlement};
use settle_engine::search::orchestrator::{find_best_settlement, SearchConfig};
use settle_engine::simulation::random_ledger::{generate_random_ledger, LedgerConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settle-engine — minimal-transaction debt settlement

USAGE:
    settle-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute a minimal settlement for a set of balances
    generate    Generate a random balanced ledger (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Balances file: .json or .csv
    --trials <N>        Number of randomized trials (default: 1001)
    --seed <S>          Base random seed (default: 0)
    --workers <N>       Worker threads (default: available cores)
    --format <FORMAT>   Output format: text (default), json, or html

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --transfers <N>     Number of random transfers (default: 30)
    --max-amount <N>    Maximum transfer in cents (default: 10000)
    --seed <S>          Generation seed (default: 0)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    settle-engine settle --input balances.json
    settle-engine settle --input cashouts.csv --trials 5000 --format html
    settle-engine generate --participants 8 --transfers 25 --output test.json"#
    );
}

/// JSON schema for input balances.
#[derive(serde::Deserialize)]
struct BalanceInput {
    participant: String,
    balance: i64,
}

#[derive(serde::Deserialize)]
struct BalancesFile {
    balances: Vec<BalanceInput>,
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettlementOutput {
    trials: usize,
    seed: u64,
    payment_count: usize,
    settlement: Settlement,
}

fn load_ledger(path: &str) -> BalanceLedger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    if path.to_lowercase().ends_with(".csv") {
        load_ledger_csv(&content)
    } else {
        load_ledger_json(&content)
    }
}

fn load_ledger_json(content: &str) -> BalanceLedger {
    let file: BalancesFile = serde_json::from_str(content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "balances": [
    {{ "participant": "@alice", "balance": -500 }}
  ]
}}"#
        );
        process::exit(1);
    });

    BalanceLedger::from_entries(
        file.balances
            .into_iter()
            .map(|b| (ParticipantId::new(b.participant), b.balance)),
    )
}

/// Parse a CSV export with a header row. The participant column may be
/// named "Participant" or "Venmo"; the balance column must be "Balance".
/// Balance cells are dollar amounts whose decimal point is stripped to get
/// cents; rows with an unparseable balance are skipped. Quoted fields are
/// not supported.
fn load_ledger_csv(content: &str) -> BalanceLedger {
    let mut lines = content.lines();
    let header = lines.next().unwrap_or_else(|| {
        eprintln!("Error: CSV input is empty");
        process::exit(1);
    });

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let participant_col = columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case("participant") || c.eq_ignore_ascii_case("venmo"));
    let balance_col = columns.iter().position(|c| c.eq_ignore_ascii_case("balance"));

    let (participant_col, balance_col) = match (participant_col, balance_col) {
        (Some(p), Some(b)) => (p, b),
        _ => {
            eprintln!(
                "Error: CSV header must name a 'Participant' (or 'Venmo') and a 'Balance' column"
            );
            process::exit(1);
        }
    };

    let mut ledger = BalanceLedger::new();
    for line in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let (Some(participant), Some(balance)) =
            (cells.get(participant_col), cells.get(balance_col))
        else {
            continue;
        };
        let Ok(cents) = balance.replace('.', "").parse::<i64>() else {
            continue;
        };
        ledger.add(ParticipantId::new(*participant), cents);
    }
    ledger
}

/// Wrap a participant name in a Venmo profile link.
fn href(name: &str) -> String {
    let handle = name.strip_prefix('@').unwrap_or(name);
    format!(r#"<a href="https://venmo.com/u/{}">{}</a>"#, handle, name)
}

/// Render the settlement as a `<pre>` block with linked participant names.
fn print_settlement_html(settlement: &Settlement) {
    println!("<pre>");
    let mut creditors: Vec<&ParticipantId> = settlement.creditors().collect();
    creditors.sort_by_key(|c| c.as_str().to_lowercase());

    for creditor in creditors {
        let total = settlement.received_total(creditor);
        println!(
            "{} requests {} from:",
            href(creditor.as_str()),
            format_amount(total)
        );
        let mut payments = settlement
            .payments_to(creditor)
            .unwrap_or_default()
            .to_vec();
        payments.sort_by(|a, b| {
            b.amount.cmp(&a.amount).then_with(|| {
                a.debtor
                    .as_str()
                    .to_lowercase()
                    .cmp(&b.debtor.as_str().to_lowercase())
            })
        });
        for payment in &payments {
            println!(
                "\t{:>8} {}",
                format_amount(payment.amount),
                href(payment.debtor.as_str())
            );
        }
        println!();
    }
    println!("</pre>");
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = SearchConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--trials" => {
                i += 1;
                config.num_trials = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--trials requires a number");
                    process::exit(1);
                });
            }
            "--seed" => {
                i += 1;
                config.base_seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a number");
                    process::exit(1);
                });
            }
            "--workers" => {
                i += 1;
                config.workers = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--workers requires a number");
                    process::exit(1);
                });
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text', 'json', or 'html'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let ledger = load_ledger(&path);
    log::info!(
        "settling {} participants over {} trials on {} workers",
        ledger.len(),
        config.num_trials,
        config.workers
    );

    let settlement = find_best_settlement(&ledger, &config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    match format.as_str() {
        "json" => {
            let output = SettlementOutput {
                trials: config.num_trials,
                seed: config.base_seed,
                payment_count: settlement.payment_count(),
                settlement,
            };
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        "html" => print_settlement_html(&settlement),
        _ => print!("{}", settlement),
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--transfers" => {
                i += 1;
                config.transfer_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--transfers requires a number");
                        process::exit(1);
                    });
            }
            "--max-amount" => {
                i += 1;
                config.max_amount = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--max-amount requires a number");
                    process::exit(1);
                });
            }
            "--seed" => {
                i += 1;
                config.seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&config);

    #[derive(serde::Serialize)]
    struct OutputBalance {
        participant: String,
        balance: i64,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        balances: Vec<OutputBalance>,
    }

    let output = OutputFile {
        balances: ledger
            .entries()
            .iter()
            .map(|(participant, balance)| OutputBalance {
                participant: participant.to_string(),
                balance: *balance,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} balances over {} transfers → {}",
            ledger.len(),
            config.transfer_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
