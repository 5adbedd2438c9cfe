//! Configuration system for a verification run.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a run. It provides:
//! 1. **Defaults:** Baseline run lengths and the seed used for replay.
//! 2. **Structures:** Sections for general, store geometry, stimulus, timing and scoreboard policy.
//! 3. **Enums:** Stimulus schedule and response ordering.
//!
//! Configuration is deserialized from JSON or built with `Config::default()`.

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::VerifyError;

/// Default run-level constants.
mod defaults {
    /// Seed for the stimulus generator when none is given.
    pub const SEED: u64 = 0x5EED_CAFE;

    /// Mutations issued per run.
    pub const UPDATES: u64 = 100_000;

    /// Queries issued per run.
    pub const QUERIES: u64 = 100_000;

    /// Share of steps that issue a query under the interleaved schedule.
    pub const QUERY_PERCENT: u32 = 50;
}

/// Order in which stimulus is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Schedule {
    /// Issue every mutation, drain, then issue every query, drain.
    #[default]
    Phased,
    /// Each step picks a mutation or a query at random.
    Interleaved,
}

/// Ordering domain of responses within a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Ordering {
    /// One FIFO per class; responses return in issue order.
    #[default]
    Global,
    /// One FIFO per bucket; responses only keep issue order within a bucket.
    PerBucket,
}

/// Root configuration structure containing all run settings.
///
/// # Examples
///
/// ```
/// use tbcheck_core::config::{Config, Schedule};
///
/// let json = r#"{
///     "general": { "seed": 7 },
///     "store": { "buckets": 8, "capacity": 4 },
///     "stimulus": { "updates": 500, "queries": 500, "schedule": "Interleaved" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.general.seed, 7);
/// assert_eq!(config.store.buckets, 8);
/// assert_eq!(config.stimulus.schedule, Schedule::Interleaved);
/// assert_eq!(config.stimulus.error_percent, 10);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General run settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Reference store geometry
    #[serde(default)]
    pub store: StoreConfig,
    /// Stimulus mix and lengths
    #[serde(default)]
    pub stimulus: StimulusConfig,
    /// Issue and drain timing
    #[serde(default)]
    pub timing: TimingConfig,
    /// Scoreboard escalation policy
    #[serde(default)]
    pub scoreboard: ScoreboardConfig,
}

impl Config {
    /// Parses a JSON document and validates the result.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`VerifyError::InvalidConfig`] if the document is malformed or fails
    /// [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, VerifyError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| VerifyError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// [`VerifyError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.store.buckets == 0 {
            return Err(VerifyError::InvalidConfig("store.buckets must be non-zero".into()));
        }
        if self.store.capacity == 0 {
            return Err(VerifyError::InvalidConfig("store.capacity must be non-zero".into()));
        }
        if self.stimulus.weights.total() == 0 {
            return Err(VerifyError::InvalidConfig(
                "stimulus.weights must not all be zero".into(),
            ));
        }
        if self.stimulus.error_percent > 100 {
            return Err(VerifyError::InvalidConfig(format!(
                "stimulus.error_percent {} exceeds 100",
                self.stimulus.error_percent
            )));
        }
        if self.stimulus.query_percent > 100 {
            return Err(VerifyError::InvalidConfig(format!(
                "stimulus.query_percent {} exceeds 100",
                self.stimulus.query_percent
            )));
        }
        Ok(())
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Seed of the stimulus generator; equal seeds replay equal stimulus
    #[serde(default = "GeneralConfig::default_seed")]
    pub seed: u64,

    /// Log every issued request and validated response at debug level
    #[serde(default)]
    pub trace: bool,
}

impl GeneralConfig {
    fn default_seed() -> u64 {
        defaults::SEED
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            trace: false,
        }
    }
}

/// Reference store geometry. Must match the design's parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Number of buckets (M)
    #[serde(default = "StoreConfig::default_buckets")]
    pub buckets: usize,

    /// Entries per bucket (N)
    #[serde(default = "StoreConfig::default_capacity")]
    pub capacity: usize,
}

impl StoreConfig {
    fn default_buckets() -> usize {
        constants::BUCKET_COUNT
    }

    fn default_capacity() -> usize {
        constants::BUCKET_CAPACITY
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buckets: constants::BUCKET_COUNT,
            capacity: constants::BUCKET_CAPACITY,
        }
    }
}

/// Relative weights of the four mutation opcodes.
///
/// A draw in `0..total()` is mapped through the cumulative weights in the
/// order `ADD`, `DELETE`, `REPLACE`, `CLEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OpWeights {
    /// Weight of `ADD`
    #[serde(default = "OpWeights::default_add")]
    pub add: u32,
    /// Weight of `DELETE`
    #[serde(default = "OpWeights::default_delete")]
    pub delete: u32,
    /// Weight of `REPLACE`
    #[serde(default = "OpWeights::default_replace")]
    pub replace: u32,
    /// Weight of `CLEAR`
    #[serde(default = "OpWeights::default_clear")]
    pub clear: u32,
}

impl OpWeights {
    fn default_add() -> u32 {
        constants::WEIGHT_ADD
    }

    fn default_delete() -> u32 {
        constants::WEIGHT_DELETE
    }

    fn default_replace() -> u32 {
        constants::WEIGHT_REPLACE
    }

    fn default_clear() -> u32 {
        constants::WEIGHT_CLEAR
    }

    /// Sum of all weights, widened so that any four `u32` weights fit.
    pub const fn total(&self) -> u64 {
        self.add as u64 + self.delete as u64 + self.replace as u64 + self.clear as u64
    }
}

impl Default for OpWeights {
    fn default() -> Self {
        Self {
            add: Self::default_add(),
            delete: Self::default_delete(),
            replace: Self::default_replace(),
            clear: Self::default_clear(),
        }
    }
}

/// Stimulus lengths and mix.
#[derive(Debug, Clone, Deserialize)]
pub struct StimulusConfig {
    /// Mutations to issue
    #[serde(default = "StimulusConfig::default_updates")]
    pub updates: u64,

    /// Queries to issue
    #[serde(default = "StimulusConfig::default_queries")]
    pub queries: u64,

    /// Phased or interleaved issue order
    #[serde(default)]
    pub schedule: Schedule,

    /// Share of interleaved steps that issue a query, in percent
    #[serde(default = "StimulusConfig::default_query_percent")]
    pub query_percent: u32,

    /// Share of requests allowed to violate their preconditions, in percent
    #[serde(default = "StimulusConfig::default_error_percent")]
    pub error_percent: u32,

    /// Draws for a well-formed mutation before falling back to `CLEAR`
    #[serde(default = "StimulusConfig::default_retries")]
    pub retries: u32,

    /// Draws for a well-formed query before falling back to level 0
    #[serde(default = "StimulusConfig::default_query_retries")]
    pub query_retries: u32,

    /// Opcode weights
    #[serde(default)]
    pub weights: OpWeights,
}

impl StimulusConfig {
    fn default_updates() -> u64 {
        defaults::UPDATES
    }

    fn default_queries() -> u64 {
        defaults::QUERIES
    }

    fn default_query_percent() -> u32 {
        defaults::QUERY_PERCENT
    }

    fn default_error_percent() -> u32 {
        constants::ERROR_PERCENT
    }

    fn default_retries() -> u32 {
        constants::UPDATE_RETRIES
    }

    fn default_query_retries() -> u32 {
        constants::QUERY_RETRIES
    }
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            updates: defaults::UPDATES,
            queries: defaults::QUERIES,
            schedule: Schedule::default(),
            query_percent: defaults::QUERY_PERCENT,
            error_percent: constants::ERROR_PERCENT,
            retries: constants::UPDATE_RETRIES,
            query_retries: constants::QUERY_RETRIES,
            weights: OpWeights::default(),
        }
    }
}

/// Issue and drain timing, in clock cycles.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Idle cycles after each accepted request
    #[serde(default = "TimingConfig::default_issue_gap")]
    pub issue_gap: u64,

    /// Idle cycles after each stimulus phase
    #[serde(default = "TimingConfig::default_drain_cycles")]
    pub drain_cycles: u64,

    /// Cycles to wait for `ready` before failing the run
    #[serde(default = "TimingConfig::default_stall_limit")]
    pub stall_limit: u64,
}

impl TimingConfig {
    fn default_issue_gap() -> u64 {
        constants::ISSUE_GAP
    }

    fn default_drain_cycles() -> u64 {
        constants::DRAIN_CYCLES
    }

    fn default_stall_limit() -> u64 {
        constants::STALL_LIMIT
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            issue_gap: constants::ISSUE_GAP,
            drain_cycles: constants::DRAIN_CYCLES,
            stall_limit: constants::STALL_LIMIT,
        }
    }
}

/// Scoreboard escalation policy and ordering domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreboardConfig {
    /// Ordering domain of responses
    #[serde(default)]
    pub ordering: Ordering,

    /// Abort the run on the first value mismatch
    #[serde(default)]
    pub fatal_on_mismatch: bool,

    /// Abort the run on a response with no outstanding expectation
    #[serde(default)]
    pub fatal_on_unexpected: bool,
}
