//! Constrained-random request generator.
//!
//! Requests are drawn against the current occupancy of the reference store
//! so that most of them are well-formed. A fixed share of requests is allowed
//! to ignore its preconditions (`ADD` into a full bucket, `DELETE` of an
//! absent key, a query past the bucket length) to cover the design's error
//! paths.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{OpWeights, StimulusConfig};
use crate::model::request::{Op, Query, Request, Update};
use crate::model::store::Store;

/// Stimulus generator owning its own random source.
///
/// Equal seeds against equal store histories produce equal request streams.
#[derive(Debug, Clone)]
pub struct Generator<R = StdRng> {
    rng: R,
    weights: OpWeights,
    error_percent: u32,
    query_percent: u32,
    retries: u32,
    query_retries: u32,
}

impl Generator<StdRng> {
    /// Creates a generator seeded from `seed`.
    pub fn seeded(config: &StimulusConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    /// Creates a generator drawing from `rng`.
    pub fn with_rng(config: &StimulusConfig, rng: R) -> Self {
        Self {
            rng,
            weights: config.weights,
            error_percent: config.error_percent,
            query_percent: config.query_percent,
            retries: config.retries,
            query_retries: config.query_retries,
        }
    }

    /// Whether the next request may ignore its preconditions.
    fn allow_error(&mut self) -> bool {
        self.rng.gen_range(0..100) < self.error_percent
    }

    /// Picks an opcode from the cumulative weight table.
    fn draw_op(&mut self) -> Op {
        let w = self.weights;
        let add = u64::from(w.add);
        let delete = add + u64::from(w.delete);
        let replace = delete + u64::from(w.replace);
        let i = self.rng.gen_range(0..w.total());
        if i < add {
            Op::Add
        } else if i < delete {
            Op::Delete
        } else if i < replace {
            Op::Replace
        } else {
            Op::Clear
        }
    }

    /// Random key not present in bucket `id`.
    fn fresh_key(&mut self, store: &Store, id: usize) -> u64 {
        let bucket = store.bucket(id);
        loop {
            let key: u64 = self.rng.r#gen();
            if !bucket.contains(key) {
                return key;
            }
        }
    }

    /// Random key already present in bucket `id`, if any.
    fn existing_key(&mut self, store: &Store, id: usize) -> Option<u64> {
        store
            .entries(id)
            .choose(&mut self.rng)
            .map(|entry| entry.key)
    }

    /// Draws a mutation for a random bucket.
    pub fn next_update(&mut self, store: &Store) -> Update {
        let id = self.rng.gen_range(0..store.bucket_count());
        let mut update = self.update_for(store, id);
        update.size = self.rng.r#gen();
        update
    }

    /// Draws the opcode and key for bucket `id`; the size is left at zero.
    ///
    /// Falls back to `CLEAR` when no acceptable draw is found within the
    /// retry budget.
    pub fn update_for(&mut self, store: &Store, id: usize) -> Update {
        let allow_error = self.allow_error();
        let sz = store.len(id);
        let capacity = store.capacity();

        for _ in 0..self.retries {
            match self.draw_op() {
                Op::Add => {
                    if sz < capacity || allow_error {
                        let key = self.fresh_key(store, id);
                        assert!(
                            !store.bucket(id).contains(key),
                            "generated ADD duplicates key {key:#x} in bucket {id}"
                        );
                        return Update::add(id, key, 0);
                    }
                }
                op @ (Op::Delete | Op::Replace) => {
                    if sz != 0 || allow_error {
                        let key = if allow_error {
                            self.fresh_key(store, id)
                        } else {
                            match self.existing_key(store, id) {
                                Some(key) => key,
                                None => continue,
                            }
                        };
                        return Update { id, op, key, size: 0 };
                    }
                }
                Op::Clear => return Update::clear(id),
            }
        }
        Update::clear(id)
    }

    /// Draws a rank query.
    ///
    /// Well-formed queries target a non-empty bucket at a level below its
    /// length. Falls back to level 0 of the last drawn bucket.
    pub fn next_query(&mut self, store: &Store) -> Query {
        let allow_error = self.allow_error();
        let mut id = 0;

        for _ in 0..self.query_retries {
            id = self.rng.gen_range(0..store.bucket_count());
            let sz = store.len(id);
            if sz != 0 || allow_error {
                let level = self.rng.gen_range(0..store.capacity());
                if level < sz || allow_error {
                    return Query::new(id, level);
                }
            }
        }
        Query::new(id, 0)
    }

    /// Draws either a mutation or a query according to the query share.
    pub fn next_request(&mut self, store: &Store) -> Request {
        if self.rng.gen_range(0..100) < self.query_percent {
            Request::Query(self.next_query(store))
        } else {
            Request::Update(self.next_update(store))
        }
    }
}
