//! Ordered response matcher.
//!
//! Holds, per ordering context, the FIFO of expectations recorded when
//! requests were issued. Each observed response pops the oldest expectation
//! of its context and is compared against it. Responses may arrive any
//! number of cycles after issue; only their relative order within a context
//! matters.

use std::collections::VecDeque;

use tracing::{debug, error, warn};

use crate::common::error::VerifyError;
use crate::scoreboard::expect::Expect;

/// Escalation policy for one response class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    /// Return an error on the first value mismatch.
    pub fatal_on_mismatch: bool,
    /// Return an error on a response with no outstanding expectation.
    pub fatal_on_unexpected: bool,
}

/// Result of matching one observed response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The response satisfied the oldest expectation.
    Matched {
        /// Expectation that was consumed.
        expected: T,
    },
    /// The response did not satisfy the oldest expectation, which is consumed regardless.
    Mismatched {
        /// Expectation that was consumed.
        expected: T,
        /// Observed value.
        actual: T,
    },
    /// Nothing was outstanding for the context.
    Unexpected {
        /// Observed value.
        actual: T,
    },
}

impl<T> Outcome<T> {
    /// Whether the response was accepted.
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

#[derive(Clone, Debug)]
struct Pending<T> {
    value: T,
    detail: Option<String>,
}

/// Per-class scoreboard with one FIFO per ordering context.
///
/// Context ids index an arena of queues; a class whose responses are
/// globally ordered uses a single context, 0.
#[derive(Clone, Debug)]
pub struct Scoreboard<T> {
    class: &'static str,
    queues: Vec<VecDeque<Pending<T>>>,
    policy: Policy,
    trace: bool,
    recorded: u64,
    matched: u64,
    mismatched: u64,
    unexpected: u64,
    missing: u64,
    log: Vec<String>,
}

impl<T: Expect> Scoreboard<T> {
    /// Creates a scoreboard for `class` with `contexts` independent queues.
    pub fn new(class: &'static str, contexts: usize, policy: Policy) -> Self {
        Self {
            class,
            queues: vec![VecDeque::new(); contexts.max(1)],
            policy,
            trace: false,
            recorded: 0,
            matched: 0,
            mismatched: 0,
            unexpected: 0,
            missing: 0,
            log: Vec::new(),
        }
    }

    /// Also records validated responses in the log.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Class name used in diagnostics.
    pub const fn class(&self) -> &'static str {
        self.class
    }

    /// Number of ordering contexts.
    pub fn contexts(&self) -> usize {
        self.queues.len()
    }

    /// Appends an expectation to the tail of `ctx`'s queue.
    ///
    /// # Panics
    ///
    /// Panics if `ctx` is not below [`Scoreboard::contexts`].
    pub fn record_expected(&mut self, ctx: usize, value: T) {
        self.push(ctx, value, None);
    }

    /// Appends an expectation carrying diagnostic context, printed on mismatch.
    ///
    /// # Panics
    ///
    /// Panics if `ctx` is not below [`Scoreboard::contexts`].
    pub fn record_expected_with(&mut self, ctx: usize, value: T, detail: impl Into<String>) {
        self.push(ctx, value, Some(detail.into()));
    }

    fn push(&mut self, ctx: usize, value: T, detail: Option<String>) {
        assert!(
            ctx < self.queues.len(),
            "{} context {ctx} out of range ({} contexts)",
            self.class,
            self.queues.len()
        );
        self.queues[ctx].push_back(Pending { value, detail });
        self.recorded += 1;
    }

    /// Matches an observed response against the oldest expectation of `ctx`.
    ///
    /// A context outside the arena is treated like an empty queue: the design
    /// reported a context that was never issued.
    ///
    /// # Errors
    ///
    /// [`VerifyError::UnexpectedResponse`] or [`VerifyError::Mismatch`] when
    /// the class policy makes that failure fatal. Non-fatal failures are
    /// returned as [`Outcome`] variants and recorded in the log.
    pub fn on_observed(&mut self, ctx: usize, actual: T) -> Result<Outcome<T>, VerifyError> {
        let Some(pending) = self.queues.get_mut(ctx).and_then(VecDeque::pop_front) else {
            self.unexpected += 1;
            let line = format!("Unexpected {} response on context {ctx}: {actual}", self.class);
            error!("{line}");
            self.log.push(line);
            if self.policy.fatal_on_unexpected {
                return Err(VerifyError::UnexpectedResponse {
                    class: self.class,
                    context: ctx,
                    actual: actual.to_string(),
                });
            }
            return Ok(Outcome::Unexpected { actual });
        };

        if pending.value.matches(&actual) {
            self.matched += 1;
            debug!("{} response validated: {actual}", self.class);
            if self.trace {
                self.log
                    .push(format!("{} response validated on context {ctx}: {actual}", self.class));
            }
            return Ok(Outcome::Matched {
                expected: pending.value,
            });
        }

        self.mismatched += 1;
        let line = format!(
            "Mismatch detected ({} context {ctx}): Actual:{actual} Expected:{}",
            self.class, pending.value
        );
        error!("{line}");
        self.log.push(line);
        if let Some(detail) = &pending.detail {
            debug!("{detail}");
            self.log.push(format!("  {detail}"));
        }
        if self.policy.fatal_on_mismatch {
            return Err(VerifyError::Mismatch {
                class: self.class,
                context: ctx,
                expected: pending.value.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(Outcome::Mismatched {
            expected: pending.value,
            actual,
        })
    }

    /// Expectations still waiting for a response, across all contexts.
    pub fn outstanding(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Expectations still waiting for a response on `ctx`.
    pub fn outstanding_in(&self, ctx: usize) -> usize {
        self.queues.get(ctx).map_or(0, VecDeque::len)
    }

    /// Flushes every outstanding expectation as a missing response.
    ///
    /// Called once the design has had its drain time; returns the number of
    /// expectations that never completed.
    pub fn drain_outstanding(&mut self) -> usize {
        let mut drained = 0;
        for (ctx, queue) in self.queues.iter_mut().enumerate() {
            for pending in queue.drain(..) {
                let line = format!(
                    "Missing {} response on context {ctx}: Expected:{}",
                    self.class, pending.value
                );
                warn!("{line}");
                self.log.push(line);
                drained += 1;
            }
        }
        self.missing += drained as u64;
        drained
    }

    /// Expectations recorded so far.
    pub const fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Responses that matched.
    pub const fn matched(&self) -> u64 {
        self.matched
    }

    /// Responses that did not match their expectation.
    pub const fn mismatched(&self) -> u64 {
        self.mismatched
    }

    /// Responses with no outstanding expectation.
    pub const fn unexpected(&self) -> u64 {
        self.unexpected
    }

    /// Expectations flushed by [`Scoreboard::drain_outstanding`].
    pub const fn missing(&self) -> u64 {
        self.missing
    }

    /// Total failures seen by this class.
    pub const fn failures(&self) -> u64 {
        self.mismatched + self.unexpected + self.missing
    }

    /// No failure has been observed.
    pub const fn is_clean(&self) -> bool {
        self.failures() == 0
    }

    /// Human-readable failure log.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Takes the log, leaving it empty.
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}
