//! Golden-model verification core for RTL testbenches.
//!
//! This crate checks a clocked design against an independently computed
//! reference behavior with the following:
//! 1. **Model:** A bounded multi-bucket sorted-list store with `CLEAR`/`ADD`/`DELETE`/`REPLACE` and rank queries.
//! 2. **Stimulus:** A seedable constrained-random generator with controlled error injection.
//! 3. **Scoreboard:** Per-class, per-context ordered expectation queues matched against observed responses.
//! 4. **Simulation:** The design-under-test interface and the clocked testbench driver.
//! 5. **Configuration and statistics:** Run parameters and the end-of-run report.

/// Common types and constants (store geometry, errors).
pub mod common;
/// Run configuration (defaults, enums, sections).
pub mod config;
/// Golden reference model (entries, requests, store).
pub mod model;
/// Response matching (expectation rules, ordered scoreboards).
pub mod scoreboard;
/// Testbench driver and design-under-test interface.
pub mod sim;
/// Run statistics collection and reporting.
pub mod stats;
/// Constrained-random stimulus generation.
pub mod stimulus;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Reference store type.
pub use crate::model::Store;
/// Per-class response scoreboard.
pub use crate::scoreboard::Scoreboard;
/// Testbench driver; construct with `Testbench::new`.
pub use crate::sim::Testbench;
