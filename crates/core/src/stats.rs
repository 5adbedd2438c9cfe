//! Run statistics collection and reporting.
//!
//! This module tracks what a verification run exercised and what it found:
//! 1. **Cycles:** Clock edges driven, including stall and drain cycles.
//! 2. **Stimulus mix:** Mutations by opcode, rejected mutations by cause, queries and error queries.
//! 3. **Scoreboard:** Per-class expectations, matches, mismatches, unexpected and missing responses.

use std::fmt::Write as _;
use std::time::Instant;

use crate::common::error::StoreError;
use crate::model::request::Op;
use crate::scoreboard::{Expect, Scoreboard};

/// Scoreboard counters for one response class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassStats {
    /// Expectations recorded at issue time.
    pub recorded: u64,
    /// Responses that matched.
    pub matched: u64,
    /// Responses that did not match.
    pub mismatched: u64,
    /// Responses with nothing outstanding.
    pub unexpected: u64,
    /// Expectations that never completed.
    pub missing: u64,
}

impl ClassStats {
    /// Snapshot of a scoreboard's counters.
    pub fn of<T: Expect>(board: &Scoreboard<T>) -> Self {
        Self {
            recorded: board.recorded(),
            matched: board.matched(),
            mismatched: board.mismatched(),
            unexpected: board.unexpected(),
            missing: board.missing(),
        }
    }

    /// Total failures.
    pub const fn failures(&self) -> u64 {
        self.mismatched + self.unexpected + self.missing
    }
}

/// Run statistics structure.
#[derive(Clone, Debug)]
pub struct RunStats {
    start_time: Instant,
    /// Clock edges driven.
    pub cycles: u64,
    /// Cycles spent waiting for the design to accept a request.
    pub stall_cycles: u64,

    /// `CLEAR` requests issued.
    pub op_clear: u64,
    /// `ADD` requests issued.
    pub op_add: u64,
    /// `DELETE` requests issued.
    pub op_delete: u64,
    /// `REPLACE` requests issued.
    pub op_replace: u64,

    /// Mutations rejected because the bucket was full.
    pub reject_full: u64,
    /// Mutations rejected because the key was already present.
    pub reject_duplicate: u64,
    /// Mutations rejected because the key was absent.
    pub reject_missing: u64,

    /// Queries issued.
    pub queries: u64,
    /// Queries expected to report an error.
    pub query_errors: u64,

    /// Update-error response class.
    pub update_errors: ClassStats,
    /// Query response class.
    pub query_responses: ClassStats,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            stall_cycles: 0,
            op_clear: 0,
            op_add: 0,
            op_delete: 0,
            op_replace: 0,
            reject_full: 0,
            reject_duplicate: 0,
            reject_missing: 0,
            queries: 0,
            query_errors: 0,
            update_errors: ClassStats::default(),
            query_responses: ClassStats::default(),
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"stimulus"`, `"scoreboard"`.
/// Pass an empty slice to `render_sections` to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "stimulus", "scoreboard"];

impl RunStats {
    /// Counts an issued mutation.
    pub fn count_update(&mut self, op: Op) {
        match op {
            Op::Clear => self.op_clear += 1,
            Op::Add => self.op_add += 1,
            Op::Delete => self.op_delete += 1,
            Op::Replace => self.op_replace += 1,
        }
    }

    /// Counts a mutation the model rejected.
    pub fn count_reject(&mut self, err: &StoreError) {
        match err {
            StoreError::Full { .. } => self.reject_full += 1,
            StoreError::DuplicateKey { .. } => self.reject_duplicate += 1,
            StoreError::KeyNotFound { .. } => self.reject_missing += 1,
        }
    }

    /// Mutations issued.
    pub const fn updates(&self) -> u64 {
        self.op_clear + self.op_add + self.op_delete + self.op_replace
    }

    /// Mutations the model rejected.
    pub const fn rejects(&self) -> u64 {
        self.reject_full + self.reject_duplicate + self.reject_missing
    }

    /// Failures across every response class.
    pub const fn failures(&self) -> u64 {
        self.update_errors.failures() + self.query_responses.failures()
    }

    /// Renders only the requested sections.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"stimulus"`
    /// or `"scoreboard"`. Pass an empty slice to render all sections.
    pub fn render_sections(&self, sections: &[&str]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| *x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let khz = if seconds > 0.0 {
            (self.cycles as f64 / seconds) / 1000.0
        } else {
            0.0
        };
        let mut out = String::new();

        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "VERIFICATION RUN STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_freq                 {khz:.2} kHz");
            let _ = writeln!(out, "stall_cycles             {}", self.stall_cycles);
            let _ = writeln!(out, "failures                 {}", self.failures());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("stimulus") {
            let updates = self.updates().max(1) as f64;
            let _ = writeln!(out, "STIMULUS");
            for (name, count) in [
                ("clear", self.op_clear),
                ("add", self.op_add),
                ("delete", self.op_delete),
                ("replace", self.op_replace),
            ] {
                let _ = writeln!(
                    out,
                    "  upt.{name:<20} {count} ({:.1}%)",
                    count as f64 / updates * 100.0
                );
            }
            let _ = writeln!(out, "  upt.reject_full        {}", self.reject_full);
            let _ = writeln!(out, "  upt.reject_duplicate   {}", self.reject_duplicate);
            let _ = writeln!(out, "  upt.reject_missing     {}", self.reject_missing);
            let _ = writeln!(out, "  qry.issued             {}", self.queries);
            let _ = writeln!(out, "  qry.error              {}", self.query_errors);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("scoreboard") {
            let _ = writeln!(out, "SCOREBOARD");
            for (name, class) in [
                ("upt_error", &self.update_errors),
                ("qry_resp", &self.query_responses),
            ] {
                let _ = writeln!(
                    out,
                    "  {name:<10} recorded={} matched={} mismatched={} unexpected={} missing={}",
                    class.recorded, class.matched, class.mismatched, class.unexpected, class.missing
                );
            }
        }
        let _ = writeln!(out, "==========================================================");
        out
    }
}
