//! Solver implementations for integer linear programming.
//!
//! Implements the `port::Solver` trait with concrete backends.

mod highs;

pub use highs::HiGHSSolver;
