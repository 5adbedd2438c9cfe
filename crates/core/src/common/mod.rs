//! Common utilities and types used throughout the testbench.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Default store geometry, stimulus weights and timing.
//! 2. **Error Handling:** Store domain errors and run-level verification errors.

/// Common constants used throughout the testbench.
pub mod constants;

/// Error types for the reference store and the verification run.
pub mod error;

pub use constants::{BUCKET_CAPACITY, BUCKET_COUNT};
pub use error::{StoreError, VerifyError};
