//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving side: the command-line interface
//! - [`solver`] - Driven side: ILP backends behind [`crate::port::Solver`]

pub mod inbound;
pub mod solver;
