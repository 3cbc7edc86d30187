use crate::core::ledger::BalanceLedger;
use crate::core::settlement::Settlement;
use crate::flow::solver::FlowError;
use crate::search::trial::{run_trial, trial_seed};
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// Errors arising from the settlement search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("ledger is not balanced: balances sum to {sum}, expected 0")]
    UnbalancedLedger { sum: i128 },
    #[error("no feasible settlement exists: {0}")]
    Infeasible(FlowError),
    #[error("all {failed} trials failed; last error: {last}")]
    AllTrialsFailed { failed: usize, last: FlowError },
}

/// Configuration for the randomized settlement search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of independent randomized trials.
    pub num_trials: usize,
    /// Worker threads running trials.
    pub workers: usize,
    /// Base seed; each trial derives its own stream from this and its index.
    pub base_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_trials: 1001,
            workers: thread::available_parallelism().map(usize::from).unwrap_or(1),
            base_seed: 0,
        }
    }
}

/// Find the settlement with the fewest payments across many randomized
/// trials.
///
/// Trials are embarrassingly parallel: a fixed pool of workers pulls trial
/// indices from a shared counter, runs each trial against the read-only
/// ledger, and sends `(trial_index, result)` to this thread. Results arrive
/// in any order; selection is by `(payment_count, trial_index)`, so the
/// earliest trial achieving the best score wins regardless of scheduling.
///
/// An empty ledger or a zero trial count yields an empty settlement. An
/// unbalanced ledger is rejected up front; if a trial nevertheless reports
/// infeasibility, dispatch of remaining trials is short-circuited
/// (in-flight trials complete) and the error is surfaced once. Any other
/// trial failure is logged and excluded from selection.
pub fn find_best_settlement(
    ledger: &BalanceLedger,
    config: &SearchConfig,
) -> Result<Settlement, SearchError> {
    if ledger.is_empty() || config.num_trials == 0 {
        return Ok(Settlement::new());
    }

    let sum: i128 = ledger.entries().iter().map(|(_, b)| i128::from(*b)).sum();
    if sum != 0 {
        return Err(SearchError::UnbalancedLedger { sum });
    }

    let num_trials = config.num_trials;
    let base_seed = config.base_seed;
    let workers = config.workers.max(1).min(num_trials);
    let next_trial = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Result<Settlement, FlowError>)>();

    let (best, failed, fatal, last_error) = thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next_trial = &next_trial;
            scope.spawn(move || loop {
                let trial = next_trial.fetch_add(1, Ordering::Relaxed);
                if trial >= num_trials {
                    break;
                }
                let result = run_trial(ledger, trial_seed(base_seed, trial as u64));
                if tx.send((trial, result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        let mut best: Option<(usize, usize, Settlement)> = None;
        let mut failed = 0usize;
        let mut fatal = false;
        let mut last_error: Option<FlowError> = None;

        for (trial, result) in rx {
            match result {
                Ok(settlement) => {
                    let score = settlement.payment_count();
                    let improves = match &best {
                        None => true,
                        Some((best_score, best_trial, _)) => {
                            (score, trial) < (*best_score, *best_trial)
                        }
                    };
                    if improves {
                        debug!("trial {} improved best: {} payments", trial, score);
                        best = Some((score, trial, settlement));
                    }
                }
                Err(err) => {
                    failed += 1;
                    warn!("trial {} failed: {}", trial, err);
                    if matches!(err, FlowError::Infeasible { .. }) {
                        // Structural, not random: stop handing out trials.
                        next_trial.store(num_trials, Ordering::Relaxed);
                        fatal = true;
                    }
                    last_error = Some(err);
                }
            }
        }
        (best, failed, fatal, last_error)
    });

    match (best, fatal, last_error) {
        (_, true, Some(err)) => Err(SearchError::Infeasible(err)),
        (Some((_, _, settlement)), _, _) => Ok(settlement),
        (None, _, Some(last)) => Err(SearchError::AllTrialsFailed { failed, last }),
        (None, _, None) => Ok(Settlement::new()),
    }
}
