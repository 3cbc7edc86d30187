//! # settle-engine
//!
//! Minimal-transaction debt settlement via randomized min-cost-flow search.
//!
//! Given a closed ledger of net balances (debtors owe, creditors are owed,
//! everything sums to zero), the engine finds a set of pairwise payments
//! that zeroes every balance using as few payments as it can. Exact
//! minimization is NP-hard; the engine instead runs many independent
//! min-cost-flow solves with freshly randomized arc costs and keeps the
//! sparsest feasible settlement found.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, the balance ledger, settlements
//! - **flow** — Transportation network construction and min-cost-flow solving
//! - **search** — Parallel randomized trial search for a sparse settlement
//! - **simulation** — Random balanced-ledger generation for testing

pub mod core;
pub mod flow;
pub mod search;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::ledger::BalanceLedger;
    pub use crate::core::participant::ParticipantId;
    pub use crate::core::settlement::{Payment, Settlement};
    pub use crate::flow::network::FlowNetwork;
    pub use crate::search::orchestrator::{find_best_settlement, SearchConfig, SearchError};
}
