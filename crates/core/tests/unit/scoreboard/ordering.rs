//! Scoreboard Ordering Properties.
//!
//! Responses are delayed by arbitrary per-context amounts. As long as each
//! context's relative order survives, the i-th response of a context must
//! pair with the i-th expectation recorded for it.

use proptest::prelude::*;
use tbcheck_core::scoreboard::{Outcome, Policy, Scoreboard};

const CONTEXTS: usize = 4;

/// `(context, value, gap)` triples: record order, expected value and the
/// extra delay applied to that response relative to its predecessor.
fn traffic() -> impl Strategy<Value = Vec<(usize, u32, u64)>> {
    prop::collection::vec((0..CONTEXTS, any::<u32>(), 0u64..20), 0..100)
}

/// Arrival order: within a context arrivals are non-decreasing, across
/// contexts they interleave freely.
fn arrivals(records: &[(usize, u32, u64)]) -> Vec<(usize, u32)> {
    let mut clock = [0u64; CONTEXTS];
    let mut timed: Vec<(u64, usize, usize, u32)> = records
        .iter()
        .enumerate()
        .map(|(i, &(ctx, value, gap))| {
            clock[ctx] = clock[ctx].max(i as u64) + gap;
            (clock[ctx], i, ctx, value)
        })
        .collect();
    timed.sort_by_key(|&(at, i, _, _)| (at, i));
    timed.into_iter().map(|(_, _, ctx, value)| (ctx, value)).collect()
}

proptest! {
    #[test]
    fn per_context_order_pairs_ith_with_ith(records in traffic()) {
        let mut board = Scoreboard::<u32>::new("prop", CONTEXTS, Policy::default());
        for &(ctx, value, _) in &records {
            board.record_expected(ctx, value);
        }
        for (ctx, value) in arrivals(&records) {
            let outcome = board.on_observed(ctx, value);
            prop_assert_eq!(outcome, Ok(Outcome::Matched { expected: value }));
        }
        prop_assert_eq!(board.outstanding(), 0);
        prop_assert!(board.is_clean());
        prop_assert_eq!(board.matched(), records.len() as u64);
    }

    #[test]
    fn swapped_distinct_values_mismatch_twice(ctx in 0..CONTEXTS, a in any::<u32>(), b in any::<u32>()) {
        prop_assume!(a != b);
        let mut board = Scoreboard::<u32>::new("prop", CONTEXTS, Policy::default());
        board.record_expected(ctx, a);
        board.record_expected(ctx, b);
        let first = board.on_observed(ctx, b);
        let second = board.on_observed(ctx, a);
        prop_assert_eq!(first, Ok(Outcome::Mismatched { expected: a, actual: b }));
        prop_assert_eq!(second, Ok(Outcome::Mismatched { expected: b, actual: a }));
        prop_assert_eq!(board.mismatched(), 2);
    }

    #[test]
    fn unanswered_expectations_are_missing(records in traffic(), answered in 0usize..100) {
        let mut board = Scoreboard::<u32>::new("prop", CONTEXTS, Policy::default());
        for &(ctx, value, _) in &records {
            board.record_expected(ctx, value);
        }
        let arrived = arrivals(&records);
        let answered = answered.min(arrived.len());
        for &(ctx, value) in &arrived[..answered] {
            let _ = board.on_observed(ctx, value);
        }
        let missing = board.drain_outstanding();
        prop_assert_eq!(missing, records.len() - answered);
        prop_assert_eq!(board.missing(), missing as u64);
        prop_assert_eq!(board.outstanding(), 0);
    }
}

#[test]
fn global_context_rejects_reordering() {
    let mut board = Scoreboard::<usize>::new("update-error", 1, Policy::default());
    board.record_expected(0, 3);
    board.record_expected(0, 0);
    // The bucket-0 fault overtakes the bucket-3 one.
    assert!(!board.on_observed(0, 0).is_ok_and(|o| o.is_match()));
    assert!(!board.on_observed(0, 3).is_ok_and(|o| o.is_match()));
    assert_eq!(board.mismatched(), 2);
}

#[test]
fn per_bucket_contexts_accept_reordering() {
    let mut board = Scoreboard::<usize>::new("update-error", 4, Policy::default());
    board.record_expected(3, 3);
    board.record_expected(0, 0);
    assert!(board.on_observed(0, 0).is_ok_and(|o| o.is_match()));
    assert!(board.on_observed(3, 3).is_ok_and(|o| o.is_match()));
    assert!(board.is_clean());
}
