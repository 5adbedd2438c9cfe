//! Request types issued to the store and to the design under test.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mutation opcode, encoded as on the design's `upt_op` port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u32)]
pub enum Op {
    /// Empty the bucket.
    Clear = 0,
    /// Insert a new entry.
    Add = 1,
    /// Remove the entry with the given key.
    Delete = 2,
    /// Overwrite the size of the entry with the given key.
    Replace = 3,
}

impl Op {
    /// Every opcode, in encoding order.
    pub const ALL: [Self; 4] = [Self::Clear, Self::Add, Self::Delete, Self::Replace];

    /// Port encoding of the opcode.
    pub const fn encoding(self) -> u32 {
        self as u32
    }

    /// Decodes a port value.
    pub const fn from_encoding(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Clear),
            1 => Some(Self::Add),
            2 => Some(Self::Delete),
            3 => Some(Self::Replace),
            _ => None,
        }
    }

    /// Uppercase mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "CLEAR",
            Self::Add => "ADD",
            Self::Delete => "DELETE",
            Self::Replace => "REPLACE",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutation request against one bucket.
///
/// `key` is ignored by `CLEAR`; `size` is only meaningful for `ADD` and `REPLACE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Update {
    /// Target bucket.
    pub id: usize,
    /// Operation to apply.
    pub op: Op,
    /// Key operand.
    pub key: u64,
    /// Size operand.
    pub size: u32,
}

impl Update {
    /// `CLEAR` of bucket `id`.
    pub const fn clear(id: usize) -> Self {
        Self { id, op: Op::Clear, key: 0, size: 0 }
    }

    /// `ADD` of `{key, size}` into bucket `id`.
    pub const fn add(id: usize, key: u64, size: u32) -> Self {
        Self { id, op: Op::Add, key, size }
    }

    /// `DELETE` of `key` from bucket `id`.
    pub const fn delete(id: usize, key: u64) -> Self {
        Self { id, op: Op::Delete, key, size: 0 }
    }

    /// `REPLACE` of the size stored under `key` in bucket `id`.
    pub const fn replace(id: usize, key: u64, size: u32) -> Self {
        Self { id, op: Op::Replace, key, size }
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id:{},op:{},key:{:#x},size:{:#x}}}",
            self.id, self.op, self.key, self.size
        )
    }
}

/// Rank query against one bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Target bucket.
    pub id: usize,
    /// Rank to read, 0 being the largest key.
    pub level: usize,
}

impl Query {
    /// Query of rank `level` in bucket `id`.
    pub const fn new(id: usize, level: usize) -> Self {
        Self { id, level }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{id:{},level:{}}}", self.id, self.level)
    }
}

/// Any request the generator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Request {
    /// Mutation.
    Update(Update),
    /// Rank query.
    Query(Query),
}

impl From<Update> for Request {
    fn from(u: Update) -> Self {
        Self::Update(u)
    }
}

impl From<Query> for Request {
    fn from(q: Query) -> Self {
        Self::Query(q)
    }
}
