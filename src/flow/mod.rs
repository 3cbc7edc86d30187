//! Transportation network construction and min-cost-flow solving.

pub mod cost;
pub mod network;
pub mod solver;
