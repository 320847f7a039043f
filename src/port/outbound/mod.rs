//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! The optimizer's only infrastructure dependency is the integer
//! programming backend.

pub mod solver;
