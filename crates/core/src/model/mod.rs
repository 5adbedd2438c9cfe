//! Golden reference model.
//!
//! This module holds the authoritative state the design is checked against:
//! 1. **Entries:** `(key, size)` pairs and the rank query result type.
//! 2. **Requests:** Mutation and query requests shared with the stimulus generator and the design.
//! 3. **Store:** `M` bounded buckets with `CLEAR`/`ADD`/`DELETE`/`REPLACE` and rank queries.

/// Stored entries and query results.
pub mod entry;

/// Mutation and query requests.
pub mod request;

/// Bounded multi-bucket store.
pub mod store;

pub use entry::{Entry, QueryResult};
pub use request::{Op, Query, Request, Update};
pub use store::{Bucket, Store};
