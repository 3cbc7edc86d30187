//! Parallel randomized trial search for a sparse settlement.

pub mod orchestrator;
pub mod trial;
