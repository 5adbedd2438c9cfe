//! Responses observed on the design's output ports.

use std::fmt;

use crate::model::entry::QueryResult;
use crate::scoreboard::Expect;

/// Pulse on the update-error port: the mutation issued to bucket `id` was rejected.
///
/// The design raises it only for failing mutations; successful ones complete silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UpdateFault {
    /// Bucket of the rejected mutation.
    pub id: usize,
}

impl fmt::Display for UpdateFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{id:{}}}", self.id)
    }
}

impl Expect for UpdateFault {
    fn matches(&self, actual: &Self) -> bool {
        self == actual
    }
}

/// One response observed on a clock edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// A mutation was rejected.
    UpdateError(UpdateFault),
    /// A query completed.
    Query {
        /// Bucket the query targeted, used for per-bucket ordering.
        id: usize,
        /// Returned result.
        result: QueryResult,
    },
}
