//! Property-based tests for attack and pruning.
//!
//! Checks that adjacency stays symmetric under arbitrary mutation
//! sequences, that pruning reaches the same k-core whatever the scan
//! order, and that attacks select exactly the requested number of nodes.

mod strategies;
#[cfg(test)]
mod tests;
mod types;
