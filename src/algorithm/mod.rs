//! Constraint-propagation solver over a grid of pattern cells

/// Fixed-size bitset of candidate pattern ids
pub mod bitset;
/// Solver grid slot
pub mod cell;
/// Candidate pruning between neighbouring cells
pub mod propagation;
/// Cell selection and the session's random source
pub mod selection;
/// Solver session and solve loops
pub mod solver;
