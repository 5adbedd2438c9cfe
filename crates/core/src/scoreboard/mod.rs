//! Scoreboard and response matching.
//!
//! Bridges the reference model, which computes results at issue time, and
//! the design, which returns them after a bounded but unknown latency:
//! 1. **Expectations:** The [`Expect`] comparison rule per value type.
//! 2. **Matcher:** Per-context FIFOs of expectations, popped and compared on every observed response.

/// Comparison rules between expected and observed values.
pub mod expect;

/// Ordered response matcher.
pub mod matcher;

pub use expect::Expect;
pub use matcher::{Outcome, Policy, Scoreboard};
