//! Stimulus generation.
//!
//! Produces mutation and query requests that are well-formed against the
//! current reference store, with a controlled share of deliberately invalid
//! requests.

/// Constrained-random generator.
pub mod generator;

pub use generator::Generator;
