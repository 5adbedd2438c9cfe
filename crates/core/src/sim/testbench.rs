//! Testbench: owns the reference store, the generator, the scoreboards and
//! the design, and drives them clock by clock.
//!
//! Every request follows the same issue protocol: wait for `ready`, drive
//! the port, clock the acceptance edge, apply the request to the store and
//! record the expectation, idle the port, dispatch the responses of that
//! edge, then clock the issue gap. Expectations are therefore always
//! recorded before any response they could pair with is dispatched.

use std::fmt;

use tracing::{debug, info};

use crate::common::error::VerifyError;
use crate::config::{Config, Ordering, Schedule};
use crate::model::entry::QueryResult;
use crate::model::request::{Query, Request, Update};
use crate::model::store::Store;
use crate::scoreboard::{Policy, Scoreboard};
use crate::sim::dut::Dut;
use crate::sim::response::{Response, UpdateFault};
use crate::stats::{ClassStats, RunStats};
use crate::stimulus::Generator;

/// Final verdict of a run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// No mismatch, unexpected or missing response was observed.
    pub passed: bool,
    /// Counters collected during the run.
    pub stats: RunStats,
    /// Failure diagnostics, in the order they were observed.
    pub log: Vec<String>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", if self.passed { "PASS" } else { "FAIL" })?;
        for line in &self.log {
            writeln!(f, "{line}")?;
        }
        f.write_str(&self.stats.render_sections(&[]))
    }
}

/// Verification testbench around a design `D`.
#[derive(Debug)]
pub struct Testbench<D> {
    config: Config,
    dut: D,
    store: Store,
    generator: Generator,
    update_errors: Scoreboard<UpdateFault>,
    queries: Scoreboard<QueryResult>,
    stats: RunStats,
    log: Vec<String>,
}

impl<D: Dut> Testbench<D> {
    /// Builds a testbench for `dut`.
    ///
    /// # Errors
    ///
    /// [`VerifyError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: Config, dut: D) -> Result<Self, VerifyError> {
        config.validate()?;

        let contexts = match config.scoreboard.ordering {
            Ordering::Global => 1,
            Ordering::PerBucket => config.store.buckets,
        };
        let policy = Policy {
            fatal_on_mismatch: config.scoreboard.fatal_on_mismatch,
            fatal_on_unexpected: config.scoreboard.fatal_on_unexpected,
        };
        let trace = config.general.trace;

        Ok(Self {
            store: Store::new(config.store.buckets, config.store.capacity),
            generator: Generator::seeded(&config.stimulus, config.general.seed),
            update_errors: Scoreboard::new("update-error", contexts, policy).with_trace(trace),
            queries: Scoreboard::new("query", contexts, policy).with_trace(trace),
            stats: RunStats::default(),
            log: Vec::new(),
            config,
            dut,
        })
    }

    /// Reference store.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Design under test.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Mutable access to the design under test.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// Update-error scoreboard.
    pub const fn update_errors(&self) -> &Scoreboard<UpdateFault> {
        &self.update_errors
    }

    /// Query scoreboard.
    pub const fn queries(&self) -> &Scoreboard<QueryResult> {
        &self.queries
    }

    /// Counters so far, with scoreboard totals refreshed.
    pub fn stats(&self) -> RunStats {
        let mut stats = self.stats.clone();
        stats.update_errors = ClassStats::of(&self.update_errors);
        stats.query_responses = ClassStats::of(&self.queries);
        stats
    }

    /// Failure diagnostics collected so far.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Resets the design and runs the configured stimulus to completion.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure; see [`VerifyError`].
    pub fn run(&mut self) -> Result<RunReport, VerifyError> {
        let stimulus = &self.config.stimulus;
        let (updates, queries, schedule) = (stimulus.updates, stimulus.queries, stimulus.schedule);
        let drain = self.config.timing.drain_cycles;

        self.dut.reset();
        info!("Stimulus starts...");

        match schedule {
            Schedule::Phased => {
                for _ in 0..updates {
                    let update = self.generator.next_update(&self.store);
                    self.issue_update(update)?;
                }
                info!("Configuration set ({updates} updates)");
                self.idle(drain)?;

                for _ in 0..queries {
                    let query = self.generator.next_query(&self.store);
                    self.issue_query(query)?;
                }
            }
            Schedule::Interleaved => {
                let (mut updates_left, mut queries_left) = (updates, queries);
                while updates_left > 0 || queries_left > 0 {
                    let request = if queries_left == 0 {
                        Request::Update(self.generator.next_update(&self.store))
                    } else if updates_left == 0 {
                        Request::Query(self.generator.next_query(&self.store))
                    } else {
                        self.generator.next_request(&self.store)
                    };
                    match request {
                        Request::Update(update) => {
                            updates_left -= 1;
                            self.issue_update(update)?;
                        }
                        Request::Query(query) => {
                            queries_left -= 1;
                            self.issue_query(query)?;
                        }
                    }
                }
            }
        }

        self.idle(drain)?;
        info!("Stimulus ends...");
        Ok(self.finish())
    }

    /// Issues one mutation and records the expected update-error response, if any.
    ///
    /// # Errors
    ///
    /// Fatal failures raised while clocking the design.
    pub fn issue_update(&mut self, update: Update) -> Result<(), VerifyError> {
        self.wait_ready()?;
        self.dut.drive_update(Some(&update));
        let responses = self.tick();

        self.stats.count_update(update.op);
        if let Err(err) = self.store.apply(&update) {
            debug!("Expecting update error: {err}");
            self.stats.count_reject(&err);
            let ctx = self.context(update.id);
            self.update_errors
                .record_expected(ctx, UpdateFault { id: update.id });
        }

        self.dut.drive_update(None);
        self.dispatch(responses)?;
        self.idle(self.config.timing.issue_gap)
    }

    /// Issues one query and records its expected result.
    ///
    /// # Errors
    ///
    /// Fatal failures raised while clocking the design.
    pub fn issue_query(&mut self, query: Query) -> Result<(), VerifyError> {
        self.wait_ready()?;
        self.dut.drive_query(Some(&query));
        let responses = self.tick();

        let expected = self.store.serve(&query);
        self.stats.queries += 1;
        if expected.error {
            self.stats.query_errors += 1;
        }
        let detail = self
            .store
            .sorted(query.id)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let ctx = self.context(query.id);
        self.queries
            .record_expected_with(ctx, expected, format!("List {query}: [{detail}]"));

        self.dut.drive_query(None);
        self.dispatch(responses)?;
        self.idle(self.config.timing.issue_gap)
    }

    /// Clocks `cycles` idle cycles, dispatching any responses.
    ///
    /// # Errors
    ///
    /// Fatal failures raised by the dispatched responses.
    pub fn idle(&mut self, cycles: u64) -> Result<(), VerifyError> {
        for _ in 0..cycles {
            let responses = self.tick();
            self.dispatch(responses)?;
        }
        Ok(())
    }

    /// Flushes outstanding expectations as missing responses and builds the report.
    pub fn finish(&mut self) -> RunReport {
        let _ = self.update_errors.drain_outstanding();
        let _ = self.queries.drain_outstanding();
        self.collect_logs();

        let stats = self.stats();
        RunReport {
            passed: stats.failures() == 0,
            stats,
            log: self.log.clone(),
        }
    }

    fn context(&self, id: usize) -> usize {
        match self.config.scoreboard.ordering {
            Ordering::Global => 0,
            Ordering::PerBucket => id,
        }
    }

    fn tick(&mut self) -> Vec<Response> {
        self.stats.cycles += 1;
        self.dut.clock()
    }

    fn wait_ready(&mut self) -> Result<(), VerifyError> {
        let mut waited = 0;
        while !self.dut.ready() {
            if waited >= self.config.timing.stall_limit {
                return Err(VerifyError::Stalled { cycles: waited });
            }
            let responses = self.tick();
            self.stats.stall_cycles += 1;
            waited += 1;
            self.dispatch(responses)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, responses: Vec<Response>) -> Result<(), VerifyError> {
        for response in responses {
            let result = match response {
                Response::UpdateError(fault) => {
                    let ctx = self.context(fault.id);
                    self.update_errors.on_observed(ctx, fault).map(drop)
                }
                Response::Query { id, result } => {
                    let ctx = self.context(id);
                    self.queries.on_observed(ctx, result).map(drop)
                }
            };
            self.collect_logs();
            result?;
        }
        Ok(())
    }

    fn collect_logs(&mut self) {
        self.log.extend(self.update_errors.take_log());
        self.log.extend(self.queries.take_log());
    }
}
