use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame_pool::PageId;

pub const DEFAULT_EXPERIMENTS: usize = 1000;
pub const DEFAULT_TRACE_LENGTH: usize = 1000;
pub const DEFAULT_MIN_FRAMES: usize = 2;
pub const DEFAULT_MAX_FRAMES: usize = 20;
pub const DEFAULT_POISSON_MEAN: f64 = 10.0;

/// A full experiment configuration. Every field has a default, so an empty JSON object gives the
/// reference workload: 1000 experiments of 1000 Poisson(10) references over 2..=20 frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub experiments: usize,
    pub trace_length: usize,
    pub min_frames: usize,
    pub max_frames: usize,
    pub trace: TraceConfig,
    /// Base seed for the trace source, drawn from OS entropy when absent
    pub seed: Option<u64>,
    pub threads: usize,
    pub averaging: Averaging,
    pub fault_counting: FaultCounting,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiments: DEFAULT_EXPERIMENTS,
            trace_length: DEFAULT_TRACE_LENGTH,
            min_frames: DEFAULT_MIN_FRAMES,
            max_frames: DEFAULT_MAX_FRAMES,
            trace: TraceConfig::default(),
            seed: None,
            threads: 1,
            averaging: Averaging::default(),
            fault_counting: FaultCounting::default(),
        }
    }
}

impl ExperimentConfig {
    /// Reads a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// The swept frame counts, lowest first
    pub fn frames(&self) -> RangeInclusive<usize> {
        self.min_frames..=self.max_frames
    }

    /// Rejects configurations which would produce meaningless or partial output
    ///
    /// Runs before any trace is generated, so an invalid configuration never gets as far as an
    /// engine
    pub fn validate(&self) -> Result<()> {
        if self.experiments == 0 {
            return Err(Error::InvalidConfig("at least one experiment is required".into()));
        }
        if self.trace_length == 0 {
            return Err(Error::InvalidConfig("the trace length must be at least 1".into()));
        }
        if self.min_frames == 0 {
            return Err(Error::InvalidConfig("the smallest frame count must be at least 1".into()));
        }
        if self.min_frames > self.max_frames {
            return Err(Error::InvalidConfig(format!(
                "the frame range {}..={} is empty",
                self.min_frames, self.max_frames
            )));
        }
        if self.threads == 0 {
            return Err(Error::InvalidConfig("at least one thread is required".into()));
        }
        self.trace.validate()
    }
}

/// Where each experiment's reference stream comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum TraceConfig {
    /// Pages drawn independently from a Poisson distribution
    Poisson { mean: f64 },
    /// Pages drawn uniformly from `0..=max`
    Uniform { max: PageId },
    /// A literal stream, repeated to fill the trace length
    Fixed { pages: Vec<PageId> },
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig::Poisson { mean: DEFAULT_POISSON_MEAN }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            TraceConfig::Poisson { mean } if !(mean.is_finite() && *mean > 0.0) => Err(
                Error::InvalidDistribution(format!("the Poisson mean must be positive and finite, got {mean}")),
            ),
            _ => Ok(()),
        }
    }
}

/// The three replacement policies the simulator compares
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[serde(alias = "fifo")]
    Fifo,
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
    #[serde(alias = "clock")]
    Clock,
}

impl PolicyKind {
    pub const COUNT: usize = 3;

    /// Every policy, in report column order
    pub const ALL: [PolicyKind; PolicyKind::COUNT] = [PolicyKind::Fifo, PolicyKind::LeastRecentlyUsed, PolicyKind::Clock];

    /// Column index of the policy in result tables
    pub fn index(self) -> usize {
        match self {
            PolicyKind::Fifo => 0,
            PolicyKind::LeastRecentlyUsed => 1,
            PolicyKind::Clock => 2,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::LeastRecentlyUsed => "LRU",
            PolicyKind::Clock => "Clock",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Which misses count as page faults
///
/// `AllMisses` counts cold misses into free frames as well as evictions. `EvictionsOnly` counts a
/// fault only when a resident page had to be discarded, so filling an empty pool is free
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum FaultCounting {
    #[default]
    #[serde(alias = "all")]
    AllMisses,
    #[serde(alias = "evictions")]
    EvictionsOnly,
}

/// How accumulated fault counts are divided by the number of experiments
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Averaging {
    /// Integer division, rounding towards zero
    #[default]
    #[serde(alias = "truncate")]
    Truncate,
    /// Floating point division
    #[serde(alias = "exact")]
    Exact,
}
