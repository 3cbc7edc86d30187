//! Foundational types: participants, the balance ledger, settlements.

pub mod ledger;
pub mod participant;
pub mod settlement;
