//! Random balanced-ledger generation for testing and benchmarking.

pub mod random_ledger;
