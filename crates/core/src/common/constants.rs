//! Global Testbench Constants.
//!
//! This module defines constants shared by the reference model, the stimulus
//! generator and the testbench driver. It includes:
//! 1. **Geometry:** Default bucket count and per-bucket capacity.
//! 2. **Stimulus:** Opcode weights, retry budgets and the error-injection rate.
//! 3. **Timing:** Idle gaps and drain lengths in clock cycles.

/// Default number of entries a single bucket can hold (N).
pub const BUCKET_CAPACITY: usize = 4;

/// Default number of independent buckets in the store (M).
pub const BUCKET_COUNT: usize = 64;

/// Denominator of the opcode weight table; weights are drawn from `0..WEIGHT_SCALE`.
pub const WEIGHT_SCALE: u32 = 1000;

/// Default weight of `ADD` out of [`WEIGHT_SCALE`].
pub const WEIGHT_ADD: u32 = 300;

/// Default weight of `DELETE` out of [`WEIGHT_SCALE`].
pub const WEIGHT_DELETE: u32 = 300;

/// Default weight of `REPLACE` out of [`WEIGHT_SCALE`].
pub const WEIGHT_REPLACE: u32 = 300;

/// Default weight of `CLEAR` out of [`WEIGHT_SCALE`].
pub const WEIGHT_CLEAR: u32 = 100;

/// Percentage of requests allowed to violate their preconditions.
pub const ERROR_PERCENT: u32 = 10;

/// Draws attempted for a well-formed mutation before falling back to `CLEAR`.
pub const UPDATE_RETRIES: u32 = 10;

/// Draws attempted for a well-formed query before falling back to level 0.
pub const QUERY_RETRIES: u32 = 100;

/// Idle cycles inserted after every issued request.
pub const ISSUE_GAP: u64 = 1;

/// Idle cycles clocked after each stimulus phase so in-flight responses land.
pub const DRAIN_CYCLES: u64 = 10;

/// Cycles the driver waits for `ready` before declaring the design stalled.
pub const STALL_LIMIT: u64 = 1000;
