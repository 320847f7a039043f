//! Application services (use cases).
//!
//! These services orchestrate domain logic and drive the solver port to
//! implement the application's use cases.

pub mod optimizer;
