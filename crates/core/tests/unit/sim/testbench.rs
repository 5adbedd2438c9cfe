//! Testbench Integration Tests.
//!
//! Runs the testbench against the pipelined mock design. A faithful design
//! must pass under any latency, back-pressure and (with per-bucket ordering)
//! skew; each injected fault must surface as the matching failure kind.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tbcheck_core::common::VerifyError;
use tbcheck_core::config::{Ordering, Schedule};
use tbcheck_core::model::{Request, Update};
use tbcheck_core::sim::{Dut, Testbench};

use crate::common::builder::script::ScriptBuilder;
use crate::common::harness::{TestContext, init_tracing, small_config};
use crate::common::mocks::dut::{Faults, PipelinedDut};

fn issue_all(tb: &mut Testbench<PipelinedDut>, script: &[Request]) {
    for request in script {
        let issued = match *request {
            Request::Update(u) => tb.issue_update(u),
            Request::Query(q) => tb.issue_query(q),
        };
        assert_eq!(issued, Ok(()));
    }
}

// ══════════════════════════════════════════════════════════
// 1. Faithful design passes
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(8)]
fn phased_run_passes_at_any_latency(#[case] latency: u64) {
    let report = TestContext::new().latency(latency).run();
    assert!(report.passed, "{report}");
    assert!(report.log.is_empty());

    let stats = &report.stats;
    assert_eq!(stats.updates(), 2_000);
    assert_eq!(stats.queries, 2_000);
    assert_eq!(stats.query_responses.recorded, 2_000);
    assert_eq!(stats.query_responses.matched, 2_000);
    assert_eq!(stats.update_errors.recorded, stats.rejects());
    assert_eq!(stats.update_errors.matched, stats.rejects());
    assert!(stats.rejects() > 0);
    assert!(stats.cycles >= 8_000);
}

#[test]
fn interleaved_run_passes() {
    let report = TestContext::new().schedule(Schedule::Interleaved).run();
    assert!(report.passed, "{report}");
    assert_eq!(report.stats.updates(), 2_000);
    assert_eq!(report.stats.queries, 2_000);
}

#[rstest]
#[case(Schedule::Phased)]
#[case(Schedule::Interleaved)]
fn per_bucket_ordering_tolerates_skew(#[case] schedule: Schedule) {
    let report = TestContext::new()
        .skew(2)
        .schedule(schedule)
        .ordering(Ordering::PerBucket)
        .with_config(|c| c.timing.drain_cycles = 32)
        .run();
    assert!(report.passed, "{report}");
}

#[test]
fn back_pressure_stalls_but_passes() {
    let report = TestContext::new().busy_every(3).run();
    assert!(report.passed, "{report}");
    assert!(report.stats.stall_cycles > 0);
}

#[test]
fn model_and_design_agree_after_run() {
    let mut tb = TestContext::new().latency(2).build();
    let report = tb.run().unwrap();
    assert!(report.passed, "{report}");
    assert_eq!(tb.dut().resets, 1);
    for id in 0..tb.store().bucket_count() {
        assert_eq!(tb.dut().list_len(id), tb.store().len(id), "bucket {id}");
    }
    assert_eq!(tb.update_errors().outstanding(), 0);
    assert_eq!(tb.queries().outstanding(), 0);
}

#[test]
fn trace_logs_validated_responses_without_failing() {
    let report = TestContext::new()
        .lengths(20, 20)
        .with_config(|c| c.general.trace = true)
        .run();
    assert!(report.passed, "{report}");
    assert!(report.log.iter().any(|line| line.contains("validated")));
}

#[test]
fn same_seed_same_run() {
    let a = TestContext::new().seed(77).run().stats;
    let b = TestContext::new().seed(77).run().stats;
    assert_eq!(a.cycles, b.cycles);
    assert_eq!(
        (a.op_clear, a.op_add, a.op_delete, a.op_replace),
        (b.op_clear, b.op_add, b.op_delete, b.op_replace)
    );
    assert_eq!(a.rejects(), b.rejects());
    assert_eq!(a.query_errors, b.query_errors);
    assert_eq!(a.update_errors, b.update_errors);
    assert_eq!(a.query_responses, b.query_responses);
}

// ══════════════════════════════════════════════════════════
// 2. Scripted sequences
// ══════════════════════════════════════════════════════════

#[test]
fn scripted_bucket_scenario_passes() {
    let mut tb = TestContext::new().latency(2).build();
    let script = ScriptBuilder::bucket(5)
        .clear()
        .add(1, 100)
        .add(2, 200)
        .add(3, 300)
        .add(4, 400)
        .query(2)
        .add(5, 500)
        .query(0)
        .delete(9)
        .replace(4, 401)
        .query(0)
        .build();
    issue_all(&mut tb, &script);
    assert_eq!(tb.idle(10), Ok(()));
    let report = tb.finish();

    assert!(report.passed, "{report}");
    assert_eq!(report.stats.reject_full, 1);
    assert_eq!(report.stats.reject_missing, 1);
    assert_eq!(report.stats.update_errors.matched, 2);
    assert_eq!(report.stats.query_responses.matched, 3);
    assert_eq!(tb.store().query(5, 0).size, 401);
}

#[test]
fn design_accepting_duplicates_is_caught() {
    let mut tb = TestContext::new()
        .latency(1)
        .faults(Faults {
            accept_duplicates: true,
            ..Faults::default()
        })
        .build();
    let script = ScriptBuilder::bucket(0).add(1, 10).add(1, 11).query(0).build();
    issue_all(&mut tb, &script);
    assert_eq!(tb.idle(10), Ok(()));
    let report = tb.finish();

    assert!(!report.passed);
    assert_eq!(report.stats.reject_duplicate, 1);
    assert_eq!(report.stats.update_errors.missing, 1);
    assert_eq!(report.stats.query_responses.mismatched, 1);
}

#[rstest]
#[case(Ordering::Global, 1)]
#[case(Ordering::PerBucket, 8)]
fn scoreboards_sized_by_ordering(#[case] ordering: Ordering, #[case] contexts: usize) {
    let tb = TestContext::new().ordering(ordering).build();
    assert_eq!(tb.update_errors().class(), "update-error");
    assert_eq!(tb.queries().class(), "query");
    assert_eq!(tb.update_errors().contexts(), contexts);
    assert_eq!(tb.queries().contexts(), contexts);
}

#[test]
fn fault_injected_mid_sequence_is_caught() {
    let mut tb = TestContext::new().latency(1).build();
    assert_eq!(tb.issue_update(Update::delete(3, 0x42)), Ok(()));
    assert_eq!(tb.idle(4), Ok(()));
    assert_eq!(tb.update_errors().matched(), 1);

    tb.dut_mut().faults.drop_update_errors = true;
    assert_eq!(tb.issue_update(Update::delete(3, 0x43)), Ok(()));
    assert_eq!(tb.idle(4), Ok(()));
    let report = tb.finish();

    assert!(!report.passed);
    assert_eq!(report.stats.update_errors.matched, 1);
    assert_eq!(report.stats.update_errors.missing, 1);
    assert_eq!(
        report.log,
        vec!["Missing update-error response on context 0: Expected:{id:3}".to_string()]
    );
}

// ══════════════════════════════════════════════════════════
// 3. Fault detection
// ══════════════════════════════════════════════════════════

#[test]
fn corrupted_query_is_a_single_mismatch() {
    let report = TestContext::new()
        .faults(Faults {
            corrupt_query: Some(5),
            ..Faults::default()
        })
        .run();
    assert!(!report.passed);
    assert_eq!(report.stats.query_responses.mismatched, 1);
    assert_eq!(report.stats.query_responses.matched, 1_999);
    assert_eq!(report.stats.failures(), 1);

    let at = report
        .log
        .iter()
        .position(|line| line.starts_with("Mismatch detected (query context 0)"));
    let Some(at) = at else {
        panic!("no mismatch line in {:?}", report.log);
    };
    assert!(report.log[at + 1].starts_with("  List {id:"));
    assert!(report.to_string().starts_with("FAIL\n"));
}

#[test]
fn dropped_update_errors_are_missing() {
    let report = TestContext::new()
        .faults(Faults {
            drop_update_errors: true,
            ..Faults::default()
        })
        .run();
    assert!(!report.passed);
    let errors = report.stats.update_errors;
    assert!(errors.recorded > 0);
    assert_eq!(errors.matched, 0);
    assert_eq!(errors.missing, errors.recorded);
    assert!(report.stats.query_responses.failures() == 0);
    assert!(report
        .log
        .iter()
        .all(|line| line.starts_with("Missing update-error response")));
}

#[test]
fn spurious_response_is_unexpected() {
    let report = TestContext::new()
        .faults(Faults {
            spurious_query_at: Some(50),
            ..Faults::default()
        })
        .run();
    assert!(!report.passed);
    assert_eq!(report.stats.query_responses.unexpected, 1);
    assert_eq!(report.stats.query_responses.mismatched, 0);
    assert_eq!(report.stats.query_responses.missing, 0);
    assert_eq!(report.log.len(), 1);
    assert!(report.log[0].starts_with("Unexpected query response on context 0"));
}

#[test]
fn global_ordering_flags_skewed_design() {
    let report = TestContext::new().skew(2).ordering(Ordering::Global).run();
    assert!(!report.passed);
    assert!(report.stats.query_responses.mismatched > 0);
}

// ══════════════════════════════════════════════════════════
// 4. Fatal failures
// ══════════════════════════════════════════════════════════

#[test]
fn fatal_mismatch_aborts_run() {
    let mut tb = TestContext::new()
        .faults(Faults {
            corrupt_query: Some(0),
            ..Faults::default()
        })
        .with_config(|c| c.scoreboard.fatal_on_mismatch = true)
        .build();
    match tb.run() {
        Err(VerifyError::Mismatch { class, context, .. }) => {
            assert_eq!(class, "query");
            assert_eq!(context, 0);
        }
        other => panic!("expected fatal mismatch, got {other:?}"),
    }
    assert!(!tb.log().is_empty());
}

#[test]
fn fatal_unexpected_aborts_run() {
    let mut tb = TestContext::new()
        .faults(Faults {
            spurious_query_at: Some(10),
            ..Faults::default()
        })
        .with_config(|c| c.scoreboard.fatal_on_unexpected = true)
        .build();
    assert!(matches!(
        tb.run(),
        Err(VerifyError::UnexpectedResponse { class: "query", context: 0, .. })
    ));
}

#[test]
fn stuck_design_stalls() {
    let mut tb = TestContext::new()
        .stuck()
        .with_config(|c| c.timing.stall_limit = 20)
        .build();
    assert_eq!(tb.run().unwrap_err(), VerifyError::Stalled { cycles: 20 });
    assert_eq!(tb.stats().stall_cycles, 20);
}

#[test]
fn invalid_config_is_rejected() {
    init_tracing();
    let mut config = small_config();
    config.store.capacity = 0;
    let built = Testbench::new(config, PipelinedDut::new(8, 4, 0));
    assert!(matches!(built, Err(VerifyError::InvalidConfig(_))));
}

#[test]
fn boxed_design_drives_like_owned() {
    init_tracing();
    let dut: Box<dyn Dut> = Box::new(PipelinedDut::new(8, 4, 1));
    let mut tb = Testbench::new(small_config(), dut).unwrap();
    let report = tb.run().unwrap();
    assert!(report.passed, "{report}");
}
