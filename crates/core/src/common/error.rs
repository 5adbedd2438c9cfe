//! Store and Verification Error definitions.
//!
//! This module defines the two error families of the testbench:
//! 1. **Store Errors:** Expected-domain outcomes of a mutation (full bucket,
//!    missing key, duplicate key). These are legitimate stimulus results and
//!    become expectations for the design's error port.
//! 2. **Verification Errors:** Failures that abort a run (fatal mismatches,
//!    responses with no outstanding expectation, stalled handshakes, bad
//!    configuration).

use thiserror::Error;

/// Outcome of a rejected mutation on the reference store.
///
/// A rejected mutation leaves the store untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `ADD` into a bucket that already holds its full capacity.
    #[error("bucket {id} is full ({capacity} entries)")]
    Full {
        /// Bucket identifier.
        id: usize,
        /// Capacity of the bucket.
        capacity: usize,
    },

    /// `ADD` of a key that is already present in the bucket.
    #[error("bucket {id} already holds key {key:#x}")]
    DuplicateKey {
        /// Bucket identifier.
        id: usize,
        /// Offending key.
        key: u64,
    },

    /// `DELETE` or `REPLACE` of a key the bucket does not hold.
    #[error("bucket {id} holds no key {key:#x}")]
    KeyNotFound {
        /// Bucket identifier.
        id: usize,
        /// Missing key.
        key: u64,
    },
}

impl StoreError {
    /// Bucket the rejected mutation targeted.
    pub const fn id(&self) -> usize {
        match *self {
            Self::Full { id, .. } | Self::DuplicateKey { id, .. } | Self::KeyNotFound { id, .. } => {
                id
            }
        }
    }
}

/// Failure that stops a verification run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A response arrived for a class/context with nothing outstanding.
    #[error("unexpected {class} response on context {context}: {actual}")]
    UnexpectedResponse {
        /// Response class name.
        class: &'static str,
        /// Ordering context the response was attributed to.
        context: usize,
        /// Rendered response value.
        actual: String,
    },

    /// A response did not match the oldest outstanding expectation.
    #[error("{class} mismatch on context {context}: actual {actual}, expected {expected}")]
    Mismatch {
        /// Response class name.
        class: &'static str,
        /// Ordering context of the comparison.
        context: usize,
        /// Rendered expected value.
        expected: String,
        /// Rendered observed value.
        actual: String,
    },

    /// The design held `ready` low for longer than the configured limit.
    #[error("design not ready after {cycles} cycles")]
    Stalled {
        /// Cycles waited.
        cycles: u64,
    },

    /// The run configuration cannot drive a meaningful run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
